use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use super::PaymentSession;
use crate::catalog::TravelService;
use crate::payment::{PaymentForm, PaymentState, PaymentTimings, PaymentWizard};
use crate::planner::ItineraryGenerator;
use crate::store::PreferenceStore;
use crate::theme::ThemeController;
use crate::tracking::{TrackingTask, VehiclePath};
use crate::views::PageContext;
use crate::{Result, WanderlustError};

/// Shared state handed to every handler
pub struct AppState<S> {
    pub service: TravelService,
    pub planner: Arc<dyn ItineraryGenerator>,
    pub theme: Arc<Mutex<ThemeController<S>>>,
    pub path: Arc<VehiclePath>,
    pub tracking: Arc<TrackingTask>,
    payment_timings: PaymentTimings,
    payments: Arc<RwLock<HashMap<u64, PaymentWizard>>>,
    next_payment_id: Arc<AtomicU64>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            planner: Arc::clone(&self.planner),
            theme: Arc::clone(&self.theme),
            path: Arc::clone(&self.path),
            tracking: Arc::clone(&self.tracking),
            payment_timings: self.payment_timings,
            payments: Arc::clone(&self.payments),
            next_payment_id: Arc::clone(&self.next_payment_id),
        }
    }
}

impl<S: PreferenceStore> AppState<S> {
    #[must_use]
    pub fn new(
        service: TravelService,
        planner: Arc<dyn ItineraryGenerator>,
        theme: ThemeController<S>,
        path: VehiclePath,
        tracking: TrackingTask,
        payment_timings: PaymentTimings,
    ) -> Self {
        Self {
            service,
            planner,
            theme: Arc::new(Mutex::new(theme)),
            path: Arc::new(path),
            tracking: Arc::new(tracking),
            payment_timings,
            payments: Arc::new(RwLock::new(HashMap::new())),
            next_payment_id: Arc::new(AtomicU64::new(1)),
        }
    }

    #[must_use]
    pub fn page_context(&self) -> PageContext<'_> {
        PageContext {
            service: &self.service,
            path: &self.path,
            tracking: self.tracking.current(),
        }
    }

    /// Open a checkout and submit `form` to it. The checkout is dropped
    /// once it has redirected and the retention period has passed.
    pub async fn start_payment(&self, form: &PaymentForm) -> Result<PaymentSession> {
        let wizard = PaymentWizard::new(self.payment_timings);
        wizard.submit(form)?;
        let state = wizard.state();
        let mut updates = wizard.subscribe();

        let id = self.next_payment_id.fetch_add(1, Ordering::Relaxed);
        self.payments.write().await.insert(id, wizard);
        info!(payment_id = id, "Checkout started");

        let payments = Arc::clone(&self.payments);
        let retention = self.payment_timings.retention;
        tokio::spawn(async move {
            // Errors once the wizard is torn down before redirecting
            let redirected = updates.wait_for(|s| s.redirect.is_some()).await.is_ok();
            if !redirected {
                return;
            }
            tokio::time::sleep(retention).await;
            if payments.write().await.remove(&id).is_some() {
                debug!(payment_id = id, "Finished checkout evicted");
            }
        });

        Ok(PaymentSession { id, state })
    }

    pub async fn payment_state(&self, id: u64) -> Result<PaymentState> {
        self.payments
            .read()
            .await
            .get(&id)
            .map(PaymentWizard::state)
            .ok_or_else(|| WanderlustError::not_found(format!("No payment with id {id}")))
    }

    /// Tear down a checkout; its pending transitions never fire
    pub async fn end_payment(&self, id: u64) -> Result<()> {
        let wizard = self
            .payments
            .write()
            .await
            .remove(&id)
            .ok_or_else(|| WanderlustError::not_found(format!("No payment with id {id}")))?;
        wizard.teardown();
        info!(payment_id = id, "Checkout closed");
        Ok(())
    }
}
