//! Start waypoint tracking.

use tracing::info;

use crate::geo::{bearing_degrees, distance_meters, Coordinate};
use crate::navigation::WaypointInfo;

/// The optional start waypoint and its derived distance/bearing.
#[derive(Debug, Default, Clone, Copy)]
pub(super) struct StartWaypoint {
    waypoint: Option<Coordinate>,
}

impl StartWaypoint {
    pub(super) fn set(&mut self, coordinate: Coordinate) {
        info!(
            latitude = coordinate.latitude,
            longitude = coordinate.longitude,
            "Start waypoint set"
        );
        self.waypoint = Some(coordinate);
    }

    pub(super) fn clear(&mut self) {
        self.waypoint = None;
    }

    pub(super) fn get(&self) -> Option<Coordinate> {
        self.waypoint
    }

    /// Distance and bearing from `position` to the waypoint.
    pub(super) fn info_from(&self, position: Option<Coordinate>) -> Option<WaypointInfo> {
        let waypoint = self.waypoint?;
        let position = position?;
        Some(WaypointInfo {
            waypoint,
            distance_m: distance_meters(position, waypoint),
            bearing_deg: bearing_degrees(position, waypoint),
        })
    }
}
