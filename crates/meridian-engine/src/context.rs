//! # Session Context
//!
//! The ambient state a form used to pull from process-wide globals
//! (active staff member, device, currency), made explicit.
//!
//! ## Why Explicit?
//! The old forms read the active staff and selected device from a shared
//! mutable store, which made the totals logic untestable in isolation.
//! Here the context is a plain value handed to the session; the core
//! crate never sees it at all.
//!
//! ## Thread Safety
//! The context is read-only after session creation, so no mutex needed.

use serde::{Deserialize, Serialize};

use meridian_core::TaxRate;

/// Ambient per-session state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    /// Staff member operating the session. Required to submit a sale.
    pub staff_id: Option<String>,

    /// Device/register identifier (printed on receipts).
    pub device_id: String,

    /// Store name (displayed on receipts).
    pub store_name: String,

    /// Currency code (ISO 4217).
    pub currency_code: String,

    /// Currency symbol (for display).
    pub currency_symbol: String,

    /// Number of decimal places for currency.
    pub currency_decimals: u8,

    /// Default tax rate in basis points applied to fresh documents.
    /// e.g., 825 = 8.25%
    pub default_tax_rate_bps: u32,
}

impl Default for SessionContext {
    /// Returns default context suitable for development.
    fn default() -> Self {
        SessionContext {
            staff_id: None,
            device_id: "pos-01".to_string(),
            store_name: "Meridian Dev Store".to_string(),
            currency_code: "USD".to_string(),
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
            default_tax_rate_bps: 0,
        }
    }
}

impl SessionContext {
    /// Creates a context from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `MERIDIAN_STORE_NAME`: Override store name
    /// - `MERIDIAN_DEVICE_ID`: Override device identifier
    /// - `MERIDIAN_TAX_RATE`: Override default tax rate (e.g., "8.25")
    pub fn from_env() -> Self {
        let mut ctx = SessionContext::default();

        if let Ok(store_name) = std::env::var("MERIDIAN_STORE_NAME") {
            ctx.store_name = store_name;
        }

        if let Ok(device_id) = std::env::var("MERIDIAN_DEVICE_ID") {
            ctx.device_id = device_id;
        }

        if let Ok(tax_rate_str) = std::env::var("MERIDIAN_TAX_RATE") {
            if let Ok(rate) = tax_rate_str.parse::<f64>() {
                ctx.default_tax_rate_bps = TaxRate::from_percentage(rate).bps();
            }
        }

        ctx
    }

    /// Formats a cent amount as a currency string.
    ///
    /// Display rounding happens here and only here; the core computes in
    /// integer cents throughout.
    pub fn format_currency(&self, cents: i64) -> String {
        let divisor = 10_i64.pow(self.currency_decimals as u32);
        let whole = (cents / divisor).abs();
        let frac = (cents % divisor).abs();

        format!(
            "{}{}{}",
            if cents < 0 { "-" } else { "" },
            self.currency_symbol,
            if self.currency_decimals > 0 {
                format!("{}.{:0width$}", whole, frac, width = self.currency_decimals as usize)
            } else {
                whole.to_string()
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency_positive() {
        let ctx = SessionContext::default();
        assert_eq!(ctx.format_currency(2420), "$24.20");
        assert_eq!(ctx.format_currency(1), "$0.01");
        assert_eq!(ctx.format_currency(0), "$0.00");
    }

    #[test]
    fn test_format_currency_negative() {
        // Purchase totals can go negative; display keeps the sign
        let ctx = SessionContext::default();
        assert_eq!(ctx.format_currency(-400), "-$4.00");
    }

    #[test]
    fn test_from_env_tax_rate_converts_to_bps() {
        std::env::set_var("MERIDIAN_TAX_RATE", "8.25");
        let ctx = SessionContext::from_env();
        std::env::remove_var("MERIDIAN_TAX_RATE");

        // Same conversion as TaxRate::from_percentage: rounded, not
        // truncated
        assert_eq!(ctx.default_tax_rate_bps, 825);
        assert_eq!(TaxRate::from_percentage(8.25).bps(), 825);
    }

    #[test]
    fn test_format_currency_zero_decimals() {
        let ctx = SessionContext {
            currency_decimals: 0,
            currency_symbol: "¥".to_string(),
            ..SessionContext::default()
        };
        assert_eq!(ctx.format_currency(1234), "¥1234");
    }
}
