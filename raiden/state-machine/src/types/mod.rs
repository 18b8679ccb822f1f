mod event;
mod state;
mod state_change;

pub use self::{
	event::*,
	state::*,
	state_change::*,
};
