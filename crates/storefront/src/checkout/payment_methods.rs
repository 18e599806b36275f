//! Payment methods offered at checkout.

use serde::Serialize;

use crate::config::PaymentConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Razorpay,
    Cashfree,
}

impl PaymentMethod {
    /// Name stored on the order.
    #[must_use]
    pub const fn stored_name(self) -> &'static str {
        match self {
            Self::Razorpay => "Razorpay",
            Self::Cashfree => "Cashfree",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Razorpay => "Pay with cards, UPI, wallets & more",
            Self::Cashfree => "Secure payment gateway",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.stored_name())
    }
}

/// A method as shown on the checkout form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentOption {
    pub method: PaymentMethod,
    pub enabled: bool,
}

/// Methods to show, in display order.
///
/// Razorpay is enabled when its key id is configured. Cashfree is listed but
/// cannot start a payment from the form; with an app id configured its
/// hosted-page returns are still verified by the checkout flow.
#[must_use]
pub fn available_methods(config: &PaymentConfig) -> Vec<PaymentOption> {
    vec![
        PaymentOption {
            method: PaymentMethod::Razorpay,
            enabled: config.razorpay_key_id.is_some(),
        },
        PaymentOption {
            method: PaymentMethod::Cashfree,
            enabled: false,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_razorpay_requires_key() {
        let methods = available_methods(&PaymentConfig::default());
        assert!(methods.iter().all(|m| !m.enabled));

        let methods = available_methods(&PaymentConfig {
            razorpay_key_id: Some("rzp_test_1".to_string()),
            cashfree_app_id: Some("cf_1".to_string()),
        });
        assert!(methods[0].enabled);
        assert_eq!(methods[1].method, PaymentMethod::Cashfree);
        assert!(!methods[1].enabled);
    }

    #[test]
    fn test_stored_name_is_capitalized() {
        assert_eq!(PaymentMethod::Razorpay.to_string(), "Razorpay");
    }
}
