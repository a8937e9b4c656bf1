//! Integración mock de pagos (estilo Stripe)
//!
//! Placeholder que simula el procesamiento del depósito. No hay
//! liquidación real de dinero: los payloads imitan la forma de la API
//! de Stripe y siempre responden éxito para importes válidos.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

/// Procesador de pagos mock
pub struct MockStripePayment;

impl MockStripePayment {
    /// Crear un payment intent mock
    pub fn create_payment_intent(amount_cents: i64, currency: &str, metadata: Value) -> Value {
        json!({
            "id": format!("pi_mock_{}_{}", amount_cents, currency),
            "object": "payment_intent",
            "amount": amount_cents,
            "currency": currency,
            "status": "requires_payment_method",
            "metadata": metadata,
            "client_secret": format!("pi_mock_{}_{}_secret", amount_cents, currency),
        })
    }

    /// Confirmar un pago mock
    pub fn confirm_payment(payment_intent_id: &str, payment_method: &str) -> Value {
        json!({
            "id": payment_intent_id,
            "object": "payment_intent",
            "status": "succeeded",
            "payment_method": payment_method,
            "charges": {
                "data": [{
                    "id": format!("ch_mock_{}", payment_intent_id),
                    "status": "succeeded",
                }]
            }
        })
    }

    /// Crear un refund mock (refund completo si amount es None)
    pub fn refund_payment(payment_intent_id: &str, amount_cents: Option<i64>) -> Value {
        json!({
            "id": format!("re_mock_{}", payment_intent_id),
            "object": "refund",
            "amount": amount_cents,
            "currency": "usd",
            "status": "succeeded",
            "payment_intent": payment_intent_id,
        })
    }
}

/// Resultado del procesamiento del depósito
#[derive(Debug, Serialize)]
pub struct PaymentResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_intent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub message: String,
}

/// Procesar el pago del depósito de una reserva.
///
/// En una integración real, el client_secret viajaría al frontend y la
/// confirmación vendría verificada desde Stripe. El mock auto-confirma.
pub fn process_deposit_payment(
    booking_id: Uuid,
    user_id: Uuid,
    vehicle_id: Uuid,
    amount: Decimal,
) -> PaymentResult {
    if amount <= Decimal::ZERO {
        return PaymentResult {
            success: false,
            payment_intent_id: None,
            status: None,
            message: "Invalid deposit amount".to_string(),
        };
    }

    // Stripe trabaja en céntimos
    let amount_cents = (amount * Decimal::from(100)).trunc().to_i64().unwrap_or(0);

    let payment_intent = MockStripePayment::create_payment_intent(
        amount_cents,
        "usd",
        json!({
            "booking_id": booking_id,
            "user_id": user_id,
            "vehicle_id": vehicle_id,
        }),
    );

    let intent_id = payment_intent["id"].as_str().unwrap_or_default().to_string();
    let confirmation = MockStripePayment::confirm_payment(&intent_id, "card_mock");

    PaymentResult {
        success: true,
        payment_intent_id: Some(intent_id),
        status: confirmation["status"].as_str().map(str::to_string),
        message: "Deposit payment processed successfully (mock)".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_deposit_is_auto_confirmed() {
        let result = process_deposit_payment(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            Decimal::new(1000, 2), // 10.00
        );

        assert!(result.success);
        assert_eq!(result.status.as_deref(), Some("succeeded"));
        assert!(result
            .payment_intent_id
            .as_deref()
            .unwrap()
            .starts_with("pi_mock_1000_"));
    }

    #[test]
    fn zero_deposit_is_rejected() {
        let result =
            process_deposit_payment(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Decimal::ZERO);

        assert!(!result.success);
        assert!(result.payment_intent_id.is_none());
    }

    #[test]
    fn refund_echoes_payment_intent() {
        let refund = MockStripePayment::refund_payment("pi_mock_1000_usd", None);
        assert_eq!(refund["status"], "succeeded");
        assert_eq!(refund["payment_intent"], "pi_mock_1000_usd");
    }
}
