//! Waypoint navigation sentences: *RMB*, *RTE*, *BOD* and the *VLW* distance log.

use super::fields::Fields;
use super::ModeIndicator;
use crate::err::DecodeError;

/// Recommended minimum navigation information towards a destination waypoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Rmb {
    pub active: bool,
    /// Cross track error in nautical miles, negative when the correction is
    /// to steer left.
    pub cross_track_error: f64,
    pub origin_waypoint: String,
    pub destination_waypoint: String,
    pub destination_latitude: f64,
    pub destination_longitude: f64,
    /// Range to destination in nautical miles.
    pub range: f64,
    /// True bearing to destination in degrees.
    pub bearing: f64,
    /// Closing velocity in knots.
    pub velocity: f64,
    pub arrived: bool,
    pub mode: Option<ModeIndicator>,
}

impl Rmb {
    pub(crate) fn decode(f: Fields) -> Result<Self, DecodeError> {
        require_fields!(f.code, f, 13);

        Ok(Rmb {
            active: f.is_active(0),
            cross_track_error: f.signed(1, 'L'),
            origin_waypoint: f.string(3),
            destination_waypoint: f.string(4),
            destination_latitude: f.latitude(5),
            destination_longitude: f.longitude(7),
            range: f.f64(9),
            bearing: f.f64(10),
            velocity: f.f64(11),
            arrived: f.is_active(12),
            mode: ModeIndicator::from_field(&f, 13)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteType {
    /// The full route, listing every waypoint.
    Complete,
    /// The working route, starting at the waypoint being navigated to.
    Working,
}

/// One page of a route's waypoint list.
#[derive(Debug, Clone, PartialEq)]
pub struct Rte {
    pub total_messages: u8,
    pub message_number: u8,
    pub route_type: RouteType,
    pub route_id: String,
    pub waypoints: Vec<String>,
}

impl Rte {
    pub(crate) fn decode(f: Fields) -> Result<Self, DecodeError> {
        require_fields!(f.code, f, 4);

        let route_type = match f.char(2) {
            Some('c') => RouteType::Complete,
            Some('w') => RouteType::Working,
            _ => return Err(f.invalid(2, format!("unknown route type \"{}\"", f.str(2)))),
        };

        Ok(Rte {
            total_messages: f.required_int(0)?,
            message_number: f.required_int(1)?,
            route_type,
            route_id: f.string(3),
            waypoints: f
                .slice(4)
                .iter()
                .filter(|w| !w.is_empty())
                .cloned()
                .collect(),
        })
    }
}

/// Bearing from the origin waypoint to the destination waypoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Bod {
    pub true_bearing: f64,
    pub magnetic_bearing: f64,
    pub destination_waypoint: String,
    pub origin_waypoint: String,
}

impl Bod {
    pub(crate) fn decode(f: Fields) -> Result<Self, DecodeError> {
        require_fields!(f.code, f, 5);

        Ok(Bod {
            true_bearing: f.f64(0),
            magnetic_bearing: f.f64(2),
            destination_waypoint: f.string(4),
            origin_waypoint: f.string(5),
        })
    }
}

/// Distance travelled through water and over ground, in nautical miles.
#[derive(Debug, Clone, PartialEq)]
pub struct Vlw {
    pub total_water_distance: f64,
    pub trip_water_distance: f64,
    pub total_ground_distance: f64,
    pub trip_ground_distance: f64,
}

impl Vlw {
    pub(crate) fn decode(f: Fields) -> Result<Self, DecodeError> {
        require_fields!(f.code, f, 4);

        Ok(Vlw {
            total_water_distance: f.f64(0),
            trip_water_distance: f.f64(2),
            total_ground_distance: f.f64(4),
            trip_ground_distance: f.f64(6),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(line: &str) -> Vec<String> {
        line.split(',').map(str::to_owned).collect()
    }

    #[test]
    fn rmb_steer_left_is_negative() {
        let v = values("A,0.66,L,003,004,4917.24,N,12309.57,W,001.3,052.5,000.5,V");
        let rmb = Rmb::decode(Fields::new("GPRMB", &v)).unwrap();
        assert!(rmb.active);
        assert_eq!(rmb.cross_track_error, -0.66);
        assert_eq!(rmb.destination_waypoint, "004");
        assert!(rmb.destination_longitude < -123.0);
        assert!(!rmb.arrived);
    }

    #[test]
    fn rte_lists_waypoints() {
        let v = values("2,1,c,0,PBRCPK,PBRTO,PTELGR,PPLAND,PYAMBU,PPFAIR,PWARRN,PMORTL,PLISMR");
        let rte = Rte::decode(Fields::new("GPRTE", &v)).unwrap();
        assert_eq!(rte.route_type, RouteType::Complete);
        assert_eq!(rte.waypoints.len(), 9);
        assert_eq!(rte.waypoints[0], "PBRCPK");
    }

    #[test]
    fn rte_rejects_unknown_type() {
        let v = values("1,1,x,0");
        assert_matches!(
            Rte::decode(Fields::new("GPRTE", &v)),
            Err(DecodeError::InvalidField { index: 2, .. })
        );
    }

    #[test]
    fn bod_without_origin() {
        let v = values("099.3,T,105.6,M,POINTB,");
        let bod = Bod::decode(Fields::new("GPBOD", &v)).unwrap();
        assert_eq!(bod.true_bearing, 99.3);
        assert_eq!(bod.destination_waypoint, "POINTB");
        assert_eq!(bod.origin_waypoint, "");
    }

    #[test]
    fn vlw_ground_distance_is_optional() {
        let v = values("7803.2,N,0.00,N");
        let vlw = Vlw::decode(Fields::new("IIVLW", &v)).unwrap();
        assert_eq!(vlw.total_water_distance, 7803.2);
        assert!(vlw.total_ground_distance.is_nan());
    }
}
