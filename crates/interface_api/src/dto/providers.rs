//! Provider DTOs

use serde::{Deserialize, Serialize};

use domain_claims::ProviderNetFeeAggregate;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TopProviderResponse {
    pub provider_npi: String,
    pub total_net_fee_cents: i64,
}

impl From<ProviderNetFeeAggregate> for TopProviderResponse {
    fn from(aggregate: ProviderNetFeeAggregate) -> Self {
        Self {
            provider_npi: aggregate.provider_npi,
            total_net_fee_cents: aggregate.total_net_fee_cents,
        }
    }
}
