pub mod building;
pub mod floor;
pub mod id;
pub mod surface;
pub mod tree;
pub mod zone;

pub use building::{Building, Document, PhotovoltaicSystem, Version};
pub use floor::{floor_above, floor_below, format_floor_number, Floor};
pub use id::{IdGenerator, NanoIds, SequentialIds};
pub use surface::{BoundaryCondition, Surface, SurfaceType};
pub use zone::{LightningRef, Zone};
