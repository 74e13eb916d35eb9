//! End-to-end pipeline execution against a bridge backed by the virtual
//! adapter. The paused tokio clock makes every send timestamp deterministic.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::time::Instant;

use glowctl_adapter_virtual::{DebugEncoder, RecordingTransport};
use glowctl_app::bridge::Bridge;
use glowctl_domain::command::TransitionTarget;
use glowctl_domain::event::{BridgeEvent, BridgeEventKind};
use glowctl_domain::group::{GroupDescriptor, GroupKind};
use glowctl_domain::id::PipelineId;
use glowctl_domain::pipeline::Pipeline;

const MIN_INTERVAL: Duration = Duration::from_millis(100);

fn bridge() -> Bridge<RecordingTransport, DebugEncoder> {
    Bridge::new(RecordingTransport::new(), DebugEncoder, MIN_INTERVAL)
}

async fn wait_for(
    events: &mut broadcast::Receiver<BridgeEvent>,
    id: PipelineId,
    kind: &BridgeEventKind,
) {
    loop {
        let event = events.recv().await.unwrap();
        if event.pipeline == id && event.kind == *kind {
            return;
        }
    }
}

#[tokio::test(start_paused = true)]
async fn should_space_sends_across_groups_by_the_bridge_interval() {
    let bridge = bridge();
    let mut events = bridge.subscribe();
    let living = bridge.add_group(GroupDescriptor::new(1, "living room", GroupKind::Rgbww).unwrap());
    let bedroom = bridge.add_group(GroupDescriptor::new(2, "bedroom", GroupKind::Rgbww).unwrap());

    let living_id = living.enqueue(Pipeline::new().on().off()).unwrap();
    let bedroom_id = bedroom.enqueue(Pipeline::new().on().off()).unwrap();

    wait_for(&mut events, living_id, &BridgeEventKind::PipelineCompleted).await;
    wait_for(&mut events, bedroom_id, &BridgeEventKind::PipelineCompleted).await;

    let payloads = bridge.transport().payloads();
    assert_eq!(payloads.len(), 4);
    assert!(payloads.iter().any(|p| p.starts_with("1:")));
    assert!(payloads.iter().any(|p| p.starts_with("2:")));

    let mut timestamps = bridge.transport().timestamps();
    timestamps.sort();
    for pair in timestamps.windows(2) {
        assert!(pair[1] - pair[0] >= MIN_INTERVAL);
    }
}

#[tokio::test(start_paused = true)]
async fn should_finish_a_timed_transition_exactly_on_schedule() {
    let bridge = bridge();
    let mut events = bridge.subscribe();
    let group = bridge.add_group(GroupDescriptor::new(1, "living room", GroupKind::Rgbww).unwrap());

    let pipeline = Pipeline::new()
        .on()
        .brightness(0.7)
        .unwrap()
        .color(170)
        .transition(TransitionTarget::default().with_hue(0), Duration::from_secs(3))
        .unwrap();
    let id = group.enqueue(pipeline).unwrap();

    wait_for(&mut events, id, &BridgeEventKind::PipelineCompleted).await;

    let payloads = bridge.transport().payloads();
    assert_eq!(&payloads[..3], ["1:on", "1:brightness=0.700", "1:hue=170"]);
    // 3 s at one send per 100 ms affords 30 interpolation steps; step 0 is
    // the starting hue, so 31 sends end exactly at the target.
    assert_eq!(payloads.len(), 3 + 31);
    assert_eq!(payloads[payloads.len() - 1], "1:hue=0");

    let timestamps = bridge.transport().timestamps();
    let transition: &[Instant] = &timestamps[3..];
    assert_eq!(
        transition[transition.len() - 1] - transition[0],
        Duration::from_secs(3)
    );
}

#[tokio::test(start_paused = true)]
async fn should_cut_a_transition_short_on_stop() {
    let bridge = bridge();
    let mut events = bridge.subscribe();
    let group = bridge.add_group(GroupDescriptor::new(1, "living room", GroupKind::Rgbww).unwrap());

    let pipeline = Pipeline::new()
        .on()
        .transition(
            TransitionTarget::default().with_brightness(1.0),
            Duration::from_secs(60),
        )
        .unwrap();
    let id = group.enqueue(pipeline).unwrap();

    // Let the pipeline start delivering before interrupting it.
    while bridge.transport().is_empty() {
        tokio::task::yield_now().await;
    }
    group.stop();

    wait_for(&mut events, id, &BridgeEventKind::PipelineStopped).await;
    let payloads = bridge.transport().payloads();
    assert!(payloads.len() < 5, "stop left {payloads:?}");
    assert_eq!(payloads[0], "1:on");
    assert!(group.state().brightness < 1.0);
}

#[tokio::test(start_paused = true)]
async fn should_isolate_queues_between_groups() {
    let bridge = bridge();
    let mut events = bridge.subscribe();
    let living = bridge.add_group(GroupDescriptor::new(1, "living room", GroupKind::Rgbww).unwrap());
    let bedroom = bridge.add_group(GroupDescriptor::new(2, "bedroom", GroupKind::Rgbww).unwrap());

    let stopped = living
        .enqueue(Pipeline::new().on().wait(Duration::from_secs(3600)).off())
        .unwrap();
    let completed = bedroom.enqueue(Pipeline::new().on()).unwrap();

    wait_for(&mut events, completed, &BridgeEventKind::PipelineCompleted).await;
    living.stop();
    wait_for(&mut events, stopped, &BridgeEventKind::PipelineStopped).await;

    let payloads = bridge.transport().payloads();
    assert!(payloads.contains(&"2:on".to_string()));
    assert!(!payloads.contains(&"1:off".to_string()));
}
