// Domain-layer modules and shared errors/models
pub mod enrichment {
    pub use crate::enrichment::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod csv_ingest {
    pub use crate::csv_ingest::*;
}

pub mod errors {
    pub use crate::errors::*;
}
