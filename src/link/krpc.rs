//! [`FlightLink`] over a kRPC connection (`krpc-client`, blocking API).

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use krpc_client::services::space_center::{Node, SpaceCenter, Vessel};
use krpc_client::Client;

use super::{AttitudeFrame, BodyInfo, FlightLink, NodeId};

/// Connection details for the kRPC server.
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint {
    pub name: String,
    pub host: String,
    pub rpc_port: u16,
    pub stream_port: u16,
}

impl Default for Endpoint {
    fn default() -> Self {
        Self {
            name: "rocket-ascent".into(),
            host: "127.0.0.1".into(),
            rpc_port: 50000,
            stream_port: 50001,
        }
    }
}

/// Active vessel reached through kRPC.
pub struct KrpcLink {
    _client: Arc<Client>,
    space_center: SpaceCenter,
    vessel: Vessel,
    nodes: HashMap<u64, Node>,
    next_node: u64,
}

impl KrpcLink {
    pub fn connect(endpoint: &Endpoint) -> Result<Self> {
        let client = Client::new(&endpoint.name, &endpoint.host, endpoint.rpc_port, endpoint.stream_port)
            .with_context(|| format!("connecting to kRPC at {}:{}", endpoint.host, endpoint.rpc_port))?;
        let space_center = SpaceCenter::new(client.clone());
        let vessel = space_center.get_active_vessel().context("no active vessel")?;
        log::info!("connected to {} as {:?}", endpoint.host, endpoint.name);
        Ok(Self {
            _client: client,
            space_center,
            vessel,
            nodes: HashMap::new(),
            next_node: 1,
        })
    }

    fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes
            .get(&id.0)
            .ok_or_else(|| anyhow!("unknown maneuver node {}", id.0))
    }
}

impl FlightLink for KrpcLink {
    fn universal_time(&self) -> Result<f64> {
        Ok(self.space_center.get_ut()?)
    }

    fn surface_altitude(&self) -> Result<f64> {
        Ok(self.vessel.flight(None)?.get_surface_altitude()?)
    }

    fn apoapsis_altitude(&self) -> Result<f64> {
        Ok(self.vessel.get_orbit()?.get_apoapsis_altitude()?)
    }

    fn periapsis_altitude(&self) -> Result<f64> {
        Ok(self.vessel.get_orbit()?.get_periapsis_altitude()?)
    }

    fn time_to_apoapsis(&self) -> Result<f64> {
        Ok(self.vessel.get_orbit()?.get_time_to_apoapsis()?)
    }

    fn semi_major_axis(&self) -> Result<f64> {
        Ok(self.vessel.get_orbit()?.get_semi_major_axis()?)
    }

    fn body(&self) -> Result<BodyInfo> {
        let body = self.vessel.get_orbit()?.get_body()?;
        Ok(BodyInfo {
            equatorial_radius: f64::from(body.get_equatorial_radius()?),
            mu: f64::from(body.get_gravitational_parameter()?),
        })
    }

    fn heading(&self) -> Result<f64> {
        Ok(f64::from(self.vessel.flight(None)?.get_heading()?))
    }

    fn pitch(&self) -> Result<f64> {
        Ok(f64::from(self.vessel.flight(None)?.get_pitch()?))
    }

    fn speed(&self) -> Result<f64> {
        let frame = self.vessel.get_orbit()?.get_body()?.get_reference_frame()?;
        Ok(self.vessel.flight(Some(&frame))?.get_speed()?)
    }

    fn mass(&self) -> Result<f64> {
        Ok(f64::from(self.vessel.get_mass()?))
    }

    fn available_thrust(&self) -> Result<f64> {
        Ok(f64::from(self.vessel.get_available_thrust()?))
    }

    fn specific_impulse(&self) -> Result<f64> {
        Ok(f64::from(self.vessel.get_specific_impulse()?))
    }

    fn any_engine_active(&self) -> Result<bool> {
        for engine in self.vessel.get_parts()?.get_engines()? {
            if engine.get_active()? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn resource_in_decouple_stage(&self, stage: i32, resource: &str) -> Result<f64> {
        let resources = self.vessel.resources_in_decouple_stage(stage, false)?;
        Ok(f64::from(resources.amount(resource.to_string())?))
    }

    fn set_throttle(&mut self, throttle: f64) -> Result<()> {
        self.vessel.get_control()?.set_throttle(throttle as f32)?;
        Ok(())
    }

    fn set_sas(&mut self, enabled: bool) -> Result<()> {
        self.vessel.get_control()?.set_sas(enabled)?;
        Ok(())
    }

    fn toggle_action_group(&mut self, group: u32) -> Result<()> {
        self.vessel.get_control()?.toggle_action_group(group)?;
        Ok(())
    }

    fn activate_next_stage(mut self) -> Result<Self> {
        self.vessel.get_control()?.activate_next_stage()?;
        // Nodes belong to the vessel that was active before staging.
        self.nodes.clear();
        self.vessel = self
            .space_center
            .get_active_vessel()
            .context("re-acquiring active vessel after staging")?;
        Ok(self)
    }

    fn engage_autopilot(&mut self, frame: AttitudeFrame) -> Result<()> {
        let autopilot = self.vessel.get_auto_pilot()?;
        match frame {
            AttitudeFrame::Surface => {
                autopilot.set_reference_frame(&self.vessel.get_surface_reference_frame()?)?;
            }
            AttitudeFrame::ManeuverNode(id) => {
                autopilot.set_reference_frame(&self.node(id)?.get_reference_frame()?)?;
                autopilot.set_target_direction((0.0, 1.0, 0.0))?;
            }
        }
        autopilot.engage()?;
        Ok(())
    }

    fn disengage_autopilot(&mut self) -> Result<()> {
        self.vessel.get_auto_pilot()?.disengage()?;
        Ok(())
    }

    fn wait_for_attitude(&mut self) -> Result<()> {
        self.vessel.get_auto_pilot()?.wait()?;
        Ok(())
    }

    fn set_target_roll(&mut self, roll: f64) -> Result<()> {
        self.vessel.get_auto_pilot()?.set_target_roll(roll as f32)?;
        Ok(())
    }

    fn set_pitch_and_heading(&mut self, pitch: f64, heading: f64) -> Result<()> {
        self.vessel
            .get_auto_pilot()?
            .target_pitch_and_heading(pitch as f32, heading as f32)?;
        Ok(())
    }

    fn add_maneuver_node(&mut self, ut: f64, prograde: f64) -> Result<NodeId> {
        let node = self.vessel.get_control()?.add_node(ut, prograde as f32, 0.0, 0.0)?;
        let id = self.next_node;
        self.next_node += 1;
        self.nodes.insert(id, node);
        Ok(NodeId(id))
    }

    fn remove_maneuver_node(&mut self, id: NodeId) -> Result<()> {
        let node = self
            .nodes
            .remove(&id.0)
            .ok_or_else(|| anyhow!("unknown maneuver node {}", id.0))?;
        node.remove()?;
        Ok(())
    }
}
