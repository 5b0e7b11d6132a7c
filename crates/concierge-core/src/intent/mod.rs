pub mod routing;
pub mod taxonomy;

pub use routing::{RoutingFlags, RoutingTable};
pub use taxonomy::Intent;
