pub mod codec;
pub mod editor;
pub mod nav;
pub mod selection;
pub mod tracker;
