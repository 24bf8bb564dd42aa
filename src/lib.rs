//! Track topology and priority allocation of train movements.
//!
//! A [`track::Track`] is built from [`topology::Section`]s. Trains describe
//! what they occupy and what they want next as lists of
//! [`segment::Segment`]s on that track, and [`allocator::allocate`] decides
//! how much of each request can be granted without two trains ever
//! sharing a [`location::Location`].

pub mod allocator;
pub mod location;
pub mod railway;
pub mod report;
pub mod route;
pub mod scenario;
pub mod segment;
pub mod topology;
pub mod track;
pub mod track_reader;
