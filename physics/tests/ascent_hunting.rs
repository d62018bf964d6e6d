use physics::{subspecs::model_sub_spec, ControlState, FlowCommand, Simulation, SimulationClock};

const DT: f32 = 1.0 / 60.0;

#[test]
fn ascend_converges_on_commanded_speed() {
    let spec = model_sub_spec();
    let target = spec.ascent_speed;
    let mut sim = Simulation::trimmed_at(spec, -1.0, SimulationClock::default()).expect("valid spec");
    assert!(sim.set_control_state(ControlState::Ascend, false));

    let mut tail_v = Vec::new();
    let mut tail_flow = Vec::new();
    let total = 60 * 30;
    for i in 0..total {
        assert_eq!(sim.advance(DT), 1);
        if i >= total - 60 * 5 {
            tail_v.push(sim.snapshot().velocity.y);
            tail_flow.push(sim.telemetry().flow);
        }
    }

    let mean = tail_v.iter().sum::<f32>() / tail_v.len() as f32;
    assert!((mean - target).abs() < 0.002, "mean ascent {mean} m/s, wanted ~{target}");
    for v in &tail_v {
        assert!((v - target).abs() < 0.005, "vertical speed strayed to {v}");
    }

    // Bang-bang control: the pumps hunt around the set point.
    let fills = tail_flow.iter().filter(|f| **f == FlowCommand::fill_both()).count();
    let empties = tail_flow.iter().filter(|f| **f == FlowCommand::empty_both()).count();
    assert!(fills > 10 && empties > 10, "fills={fills} empties={empties}");
    let switches = tail_flow.windows(2).filter(|w| w[0] != w[1]).count();
    assert!(switches > 20, "expected fill/empty alternation, saw {switches} switches");

    // Still submerged and rising.
    let snap = sim.snapshot();
    assert!(snap.depth > -1.0 && snap.depth < -0.5, "depth {}", snap.depth);
    assert!(snap.orientation_angle.abs() < 1e-3, "symmetric trim should not pitch");
}
