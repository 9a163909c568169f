use futures_util::future::join_all;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::warn;

use super::gateway_trait::GatewayKind;
use super::orchestrator::PaymentOrchestrator;
use crate::modules::payments::models::GatewayHealth;

impl PaymentOrchestrator {
    /// Probe one gateway with a cheap read-only call and time it.
    /// Unconfigured gateways report unhealthy without a network call.
    pub async fn get_gateway_health(&self, kind: GatewayKind) -> GatewayHealth {
        let Some(gateway) = self.gateway(kind) else {
            return GatewayHealth {
                healthy: false,
                response_time: 0,
                error: Some(format!("{} gateway is not configured", kind.as_str())),
            };
        };

        let started = Instant::now();
        let result = gateway.probe().await;
        let response_time = started.elapsed().as_millis() as u64;

        match result {
            Ok(()) => GatewayHealth {
                healthy: true,
                response_time,
                error: None,
            },
            Err(e) => {
                warn!(gateway = %kind, error = %e, response_time, "Gateway health probe failed");
                GatewayHealth {
                    healthy: false,
                    response_time,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Probe every known gateway concurrently; each result stands alone
    pub async fn get_all_gateways_health(&self) -> BTreeMap<GatewayKind, GatewayHealth> {
        let probes = GatewayKind::ALL
            .into_iter()
            .map(|kind| async move { (kind, self.get_gateway_health(kind).await) });

        join_all(probes).await.into_iter().collect()
    }
}
