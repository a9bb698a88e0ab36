//! One `handle_*_mode` method per insertion mode, grouped by the part of the
//! document they cover.

mod after;
mod body;
mod head;
mod select;
mod table;
mod template;
