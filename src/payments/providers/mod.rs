pub mod paypal;
pub mod payu;
pub mod stripe;

pub use paypal::{PaypalConfig, PaypalProvider};
pub use payu::{PayuConfig, PayuProvider};
pub use stripe::{StripeConfig, StripeProvider};
