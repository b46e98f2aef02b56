//! Port implementations, one module per backend area.

mod files;
mod gameserver;
mod hosting;
mod network;
mod power;
mod settings;
mod ssh;
mod system;
