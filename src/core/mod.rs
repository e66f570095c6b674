// Domain-layer modules and shared errors/models
pub mod pipeline {
    pub use crate::pipeline::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod export {
    pub use crate::export::*;
}

pub mod errors {
    pub use crate::errors::*;
}
