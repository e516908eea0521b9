mod pivot;
mod quote;
mod tick;

pub use pivot::Pivot;
pub use quote::Quote;
pub use tick::Tick;
