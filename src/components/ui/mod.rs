pub mod alert;
pub mod badge;
pub mod button;
pub mod card;
pub mod date_picker;
pub mod input;
pub mod label;
pub mod modal;
pub mod spinner;
pub mod toaster;
pub mod tooltip;

pub use alert::*;
pub use badge::*;
pub use button::*;
pub use card::*;
pub use date_picker::*;
pub use input::*;
pub use label::*;
pub use modal::*;
pub use spinner::*;
pub use toaster::*;
pub use tooltip::*;
