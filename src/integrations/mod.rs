//! External service integrations.

pub mod geocoder {
    pub use crate::geocoder::*;
}

pub mod maps_client {
    pub use crate::maps_client::*;
}

pub mod lead_client {
    pub use crate::lead_client::*;
}
