pub mod bus;
pub mod constants;
pub mod constellation;
pub mod error;
pub mod eye;
pub mod lifecycle;
pub mod math;
pub mod morph;
pub mod random;
pub mod scene;
pub mod scroll;

pub use bus::*;
pub use constants::*;
pub use constellation::*;
pub use error::*;
pub use eye::*;
pub use lifecycle::*;
pub use math::*;
pub use morph::*;
pub use random::*;
pub use scene::*;
pub use scroll::*;
