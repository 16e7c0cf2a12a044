pub mod legacy;
pub mod modern;
pub mod provider;
pub mod resolver;

pub use legacy::{LegacyDirectionsClient, LegacyDirectionsClientParams};
pub use modern::{ModernRoutesClient, ModernRoutesClientParams};
pub use provider::{Provider, ProviderError};
pub use resolver::{ModeSwitch, RouteResolution, RouteResolver, RouteResolverParams};
