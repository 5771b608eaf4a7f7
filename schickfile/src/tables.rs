use bytemuck::{Pod, Zeroable};
use crate::{byte_slice::ByteSlice, error::Result};

pub const ROUTE_COUNT: usize = 59;
pub const TRAVEL_EVENT_COUNT: usize = 155;

/// One entry of `ROUTES_TAB`, a road between two towns.
#[repr(C)]
#[derive(Zeroable, Pod, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RouteRecord {
	pub from: u8,
	pub to: u8,
	pub length: u8,
	pub speed_mod: u8,
	pub encounters: u8,
	pub unknown1: u8,
	pub unknown2: u8,
	pub fights: u8,
	pub unknown3: u8
}

/// One entry of `TEVENTS_TAB`, an event somewhere along a route.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TravelEventRecord {
	/// Index into the route table, the game stores it one based.
	pub route_id: i16,
	pub place: u8,
	pub event_id: u8
}

pub fn decode_routes(data: &[u8]) -> Result<Box<[RouteRecord]>> {
	let bytes = data.read_bytes_field(0, ROUTE_COUNT * size_of::<RouteRecord>(), "route table")?;
	Ok(bytemuck::cast_slice::<u8, RouteRecord>(bytes).into())
}

pub fn decode_travel_events(data: &[u8]) -> Result<Box<[TravelEventRecord]>> {
	let bytes = data.read_bytes_field(0, TRAVEL_EVENT_COUNT * 3, "travel event table")?;
	Ok(bytes.chunks_exact(3).map(|x| TravelEventRecord {
		route_id: x[0] as i16 - 1,
		place: x[1],
		event_id: x[2]
	}).collect())
}
