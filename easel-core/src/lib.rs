pub mod bus;
pub mod input;
pub mod surface;
pub mod navigation;
pub mod activity;
pub mod preload;
pub mod config;

pub use bus::{BusEvent, EventBus, EventKind, Subscription};
pub use input::{InputEvent, KeyCode};
pub use surface::Surface;
pub use navigation::{NavigationRule, NavigationTable};
pub use activity::{ActivityManager, HandOff, Screen, TransitionRequest};
pub use preload::{AssetLoader, Completion, ResourcePreloader};
