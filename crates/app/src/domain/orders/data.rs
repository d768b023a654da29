//! Order Data

/// Optional details supplied at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutDetails {
    pub delivery_address: Option<String>,
    pub payment_method: Option<String>,
}

impl CheckoutDetails {
    pub(crate) fn normalized(self) -> Self {
        Self {
            delivery_address: trimmed(self.delivery_address),
            payment_method: trimmed(self.payment_method),
        }
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
