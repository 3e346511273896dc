//! Demo checkout flow
//!
//! Entry -> Processing on submit, Processing -> Confirmed after the processing
//! delay, then a redirect to the dashboard once the redirect delay (counted
//! from submission) has passed. Card details are never checked.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

use crate::config::PaymentConfig;
use crate::routing::Route;
use crate::{Result, WanderlustError};

/// Card details as typed into the checkout form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PaymentForm {
    pub card_number: String,
    pub expiry: String,
    pub cvc: String,
    pub cardholder_name: String,
}

impl Default for PaymentForm {
    fn default() -> Self {
        Self {
            card_number: "4242 4242 4242 4242".to_string(),
            expiry: "12/28".to_string(),
            cvc: "123".to_string(),
            cardholder_name: "Alex Wanderer".to_string(),
        }
    }
}

impl PaymentForm {
    /// Last four digits of the card, for logs
    #[must_use]
    pub fn masked_card(&self) -> String {
        let digits: Vec<char> = self.card_number.chars().filter(char::is_ascii_digit).collect();
        let tail: String = digits[digits.len().saturating_sub(4)..].iter().collect();
        format!("**** {tail}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStep {
    Entry,
    Processing,
    Confirmed,
}

/// Wizard state as seen by the page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentState {
    pub step: PaymentStep,
    /// Set once the confirmation has been shown long enough
    pub redirect: Option<Route>,
}

impl Default for PaymentState {
    fn default() -> Self {
        Self {
            step: PaymentStep::Entry,
            redirect: None,
        }
    }
}

/// Delays driving the wizard
#[derive(Debug, Clone, Copy)]
pub struct PaymentTimings {
    pub processing: Duration,
    pub redirect: Duration,
    /// Time a finished checkout is kept after its redirect
    pub retention: Duration,
}

impl From<&PaymentConfig> for PaymentTimings {
    fn from(config: &PaymentConfig) -> Self {
        Self {
            processing: Duration::from_millis(config.processing_ms),
            redirect: Duration::from_millis(config.redirect_ms),
            retention: Duration::from_millis(config.retention_ms),
        }
    }
}

impl Default for PaymentTimings {
    fn default() -> Self {
        Self::from(&PaymentConfig::default())
    }
}

/// One checkout. Dropping or tearing it down stops pending transitions.
pub struct PaymentWizard {
    timings: PaymentTimings,
    state: watch::Sender<PaymentState>,
    cancel: CancellationToken,
}

impl PaymentWizard {
    #[must_use]
    pub fn new(timings: PaymentTimings) -> Self {
        let (state, _) = watch::channel(PaymentState::default());
        Self {
            timings,
            state,
            cancel: CancellationToken::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> PaymentState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PaymentState> {
        self.state.subscribe()
    }

    /// Accept the form and start processing. Any card data is accepted; only
    /// a wizard still showing the form can be submitted.
    #[instrument(skip(self, form), fields(card = %form.masked_card()))]
    pub fn submit(&self, form: &PaymentForm) -> Result<()> {
        let mut accepted = false;
        self.state.send_if_modified(|state| {
            if state.step == PaymentStep::Entry {
                state.step = PaymentStep::Processing;
                accepted = true;
            }
            accepted
        });
        if !accepted {
            return Err(WanderlustError::validation("payment was already submitted"));
        }
        info!("Payment submitted");

        let state = self.state.clone();
        let cancel = self.cancel.clone();
        let timings = self.timings;
        tokio::spawn(async move {
            if !wait(&cancel, timings.processing).await {
                return;
            }
            state.send_modify(|s| s.step = PaymentStep::Confirmed);
            info!("Payment confirmed");

            let remaining = timings.redirect.saturating_sub(timings.processing);
            if !wait(&cancel, remaining).await {
                return;
            }
            state.send_modify(|s| s.redirect = Some(Route::Dashboard));
            debug!("Redirecting to dashboard");
        });
        Ok(())
    }

    /// Retire the wizard; pending transitions are dropped
    pub fn teardown(&self) {
        self.cancel.cancel();
    }
}

impl Drop for PaymentWizard {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Sleep for `delay` unless cancelled first. True when the caller may proceed.
async fn wait(cancel: &CancellationToken, delay: Duration) -> bool {
    tokio::select! {
        () = cancel.cancelled() => false,
        () = tokio::time::sleep(delay) => !cancel.is_cancelled(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_defaults_are_the_placeholders() {
        let form = PaymentForm::default();
        assert_eq!(form.card_number, "4242 4242 4242 4242");
        assert_eq!(form.masked_card(), "**** 4242");
    }

    #[test]
    fn test_masked_card_with_short_input() {
        let form = PaymentForm {
            card_number: "12".to_string(),
            ..PaymentForm::default()
        };
        assert_eq!(form.masked_card(), "**** 12");
    }

    #[tokio::test(start_paused = true)]
    async fn test_happy_path_timeline() {
        let wizard = PaymentWizard::new(PaymentTimings::default());
        assert_eq!(wizard.state().step, PaymentStep::Entry);

        wizard.submit(&PaymentForm::default()).unwrap();
        assert_eq!(wizard.state().step, PaymentStep::Processing);

        tokio::time::sleep(Duration::from_millis(2999)).await;
        assert_eq!(wizard.state().step, PaymentStep::Processing);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(wizard.state().step, PaymentStep::Confirmed);
        assert_eq!(wizard.state().redirect, None);

        tokio::time::sleep(Duration::from_millis(3000)).await;
        assert_eq!(wizard.state().redirect, Some(Route::Dashboard));
    }

    #[tokio::test(start_paused = true)]
    async fn test_any_input_is_accepted() {
        let wizard = PaymentWizard::new(PaymentTimings::default());
        let form = PaymentForm {
            card_number: "not a card".to_string(),
            expiry: String::new(),
            cvc: "x".to_string(),
            cardholder_name: String::new(),
        };
        assert!(wizard.submit(&form).is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_submit_is_rejected() {
        let wizard = PaymentWizard::new(PaymentTimings::default());
        wizard.submit(&PaymentForm::default()).unwrap();
        let err = wizard.submit(&PaymentForm::default()).unwrap_err();
        assert!(matches!(err, WanderlustError::Validation { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_torn_down_wizard_never_advances() {
        let wizard = PaymentWizard::new(PaymentTimings::default());
        let updates = wizard.subscribe();
        wizard.submit(&PaymentForm::default()).unwrap();
        wizard.teardown();

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(updates.borrow().step, PaymentStep::Processing);
        assert_eq!(updates.borrow().redirect, None);
    }
}
