// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod error;
pub mod forms;
pub mod model;
pub mod reports;
pub mod results;
pub mod state;

pub use error::*;
pub use forms::*;
pub use model::*;
pub use reports::*;
pub use results::*;
pub use state::*;
