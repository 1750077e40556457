//! Ports for the analyses being checked

use crate::features::points_to::ports::AliasVerdict;
use crate::shared::models::ValueId;

/// Alias query of a static analysis
pub trait StaticAliasOracle {
    fn query(&self, a: ValueId, b: ValueId) -> AliasVerdict;
}

/// Oracle answering the same verdict for every query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstantOracle(pub AliasVerdict);

impl StaticAliasOracle for ConstantOracle {
    fn query(&self, _a: ValueId, _b: ValueId) -> AliasVerdict {
        self.0
    }
}
