//! PaymentGateway trait and its type-erased wrapper.

use std::future::Future;
use std::pin::Pin;

use paychat_types::payment::{PaymentError, PaymentRequest, PaymentResponse};

/// Trait for payment backends that can start a hosted checkout.
///
/// Implementations live in paychat-infra (e.g., `FapshiGateway`).
pub trait PaymentGateway: Send + Sync {
    /// Human-readable gateway name (e.g., "fapshi").
    fn name(&self) -> &str;

    /// Ask the gateway to create a payment link for `request`.
    fn initiate(
        &self,
        request: &PaymentRequest,
    ) -> impl Future<Output = Result<PaymentResponse, PaymentError>> + Send;
}

/// Object-safe version of [`PaymentGateway`] with boxed futures.
pub trait PaymentGatewayDyn: Send + Sync {
    fn name(&self) -> &str;

    fn initiate_boxed<'a>(
        &'a self,
        request: &'a PaymentRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PaymentResponse, PaymentError>> + Send + 'a>>;
}

impl<T: PaymentGateway> PaymentGatewayDyn for T {
    fn name(&self) -> &str {
        PaymentGateway::name(self)
    }

    fn initiate_boxed<'a>(
        &'a self,
        request: &'a PaymentRequest,
    ) -> Pin<Box<dyn Future<Output = Result<PaymentResponse, PaymentError>> + Send + 'a>> {
        Box::pin(self.initiate(request))
    }
}

/// Type-erased payment gateway.
pub struct BoxPaymentGateway {
    inner: Box<dyn PaymentGatewayDyn + Send + Sync>,
}

impl BoxPaymentGateway {
    pub fn new<T: PaymentGateway + 'static>(gateway: T) -> Self {
        Self {
            inner: Box::new(gateway),
        }
    }
}

impl PaymentGateway for BoxPaymentGateway {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn initiate(
        &self,
        request: &PaymentRequest,
    ) -> impl Future<Output = Result<PaymentResponse, PaymentError>> + Send {
        async move { self.inner.initiate_boxed(request).await }
    }
}
