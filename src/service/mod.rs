pub mod values;
pub mod accounts;
pub mod rooms;

pub use accounts::{AccountService, UserView};
pub use rooms::{RoomDetail, RoomService, RoomView};
pub use values::{MessageContent, Password, RoomName, Username};
