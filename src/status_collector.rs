use crate::error::ExporterError;
use crate::metrics_projector::MetricsProjector;
use crate::myenergi_api::MyEnergiClient;
use prometheus::Registry;
use std::sync::Arc;
use tracing::{debug, warn};

/// Drives one collection pass per external scrape: fetches both device kinds
/// concurrently, projects whatever came back, and reports any per-kind
/// failure without suppressing the sibling kind's output.
pub struct StatusCollector {
    client: Arc<MyEnergiClient>,
    projector: MetricsProjector,
}

impl StatusCollector {
    /// Builds the collector and registers its gauge set on `registry`.
    pub fn new(client: MyEnergiClient, registry: &Registry) -> Result<Self, prometheus::Error> {
        Ok(Self {
            client: Arc::new(client),
            projector: MetricsProjector::new(registry)?,
        })
    }

    /// Runs one fetch-and-project pass.
    ///
    /// The two kinds are polled as independent tasks joined without
    /// short-circuiting: one kind failing never cancels or discards the
    /// other. On partial failure the surviving kind's snapshots are still
    /// projected and the failure is returned to the caller.
    pub async fn collect(&self) -> Result<(), ExporterError> {
        let charger_client = Arc::clone(&self.client);
        let charger_task =
            tokio::spawn(async move { charger_client.fetch_chargers().await });
        let diverter_client = Arc::clone(&self.client);
        let diverter_task =
            tokio::spawn(async move { diverter_client.fetch_diverters().await });

        let charger_outcome = charger_task.await;
        let diverter_outcome = diverter_task.await;

        // Identity series are cleared before any of this pass's samples land
        // so devices that disappeared from the API leave nothing stale.
        self.projector.reset_identity();

        let mut first_failure = None;

        match flatten(charger_outcome) {
            Ok(chargers) => {
                debug!(count = chargers.len(), "projected charger snapshots");
                for snapshot in &chargers {
                    self.projector.record_charger(snapshot);
                }
            }
            Err(error) => {
                warn!("charger poll failed: {error}");
                first_failure = Some(error);
            }
        }

        match flatten(diverter_outcome) {
            Ok(diverters) => {
                debug!(count = diverters.len(), "projected diverter snapshots");
                for snapshot in &diverters {
                    self.projector.record_diverter(snapshot);
                }
            }
            Err(error) => {
                warn!("diverter poll failed: {error}");
                if first_failure.is_none() {
                    first_failure = Some(error);
                }
            }
        }

        match first_failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn flatten<T>(
    outcome: Result<Result<T, ExporterError>, tokio::task::JoinError>,
) -> Result<T, ExporterError> {
    outcome?
}
