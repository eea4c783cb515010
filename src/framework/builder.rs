use std::sync::Arc;

use super::Framework;
use crate::roles::{
    BaseData, BaseDelivery, BaseDisplay, BaseInput, BaseOutput, Data, Delivery, Display, Input,
    Output,
};

/// Builder for [`Framework`]. Roles left unset fall back to their `Base*`
/// implementation.
#[derive(Default)]
pub struct FrameworkBuilder {
    input: Option<Arc<dyn Input>>,
    data: Option<Arc<dyn Data>>,
    delivery: Option<Arc<dyn Delivery>>,
    output: Option<Arc<dyn Output>>,
    display: Option<Arc<dyn Display>>,
}

impl FrameworkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(mut self, input: impl Input + 'static) -> Self {
        self.input = Some(Arc::new(input));
        self
    }

    pub fn data(mut self, data: impl Data + 'static) -> Self {
        self.data = Some(Arc::new(data));
        self
    }

    pub fn delivery(mut self, delivery: impl Delivery + 'static) -> Self {
        self.delivery = Some(Arc::new(delivery));
        self
    }

    pub fn output(mut self, output: impl Output + 'static) -> Self {
        self.output = Some(Arc::new(output));
        self
    }

    pub fn display(mut self, display: impl Display + 'static) -> Self {
        self.display = Some(Arc::new(display));
        self
    }

    pub fn build(self) -> Framework {
        Framework {
            input: self.input.unwrap_or_else(|| Arc::new(BaseInput)),
            data: self.data.unwrap_or_else(|| Arc::new(BaseData)),
            delivery: self.delivery.unwrap_or_else(|| Arc::new(BaseDelivery)),
            output: self.output.unwrap_or_else(|| Arc::new(BaseOutput)),
            display: self.display.unwrap_or_else(|| Arc::new(BaseDisplay)),
        }
    }
}
