//! Inter-task pipeline
//!
//! One static [`Pipeline`] carries durations from the echo task to the
//! converter, distances from the converter to the display, and the
//! cycle-started token from the trigger task to the display.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use static_cell::StaticCell;

use echorange_core::pipeline::{
    DistanceConsumer, DistanceProducer, DurationConsumer, DurationProducer, Ports, TriggerReceiver,
    TriggerSender, DISTANCE_CAPACITY, DURATION_CAPACITY,
};
use echorange_core::Pipeline;

/// Mutex shared by all pipeline primitives; the echo task runs on the
/// interrupt executor, so a critical section is required
pub type PipelineMutex = CriticalSectionRawMutex;

/// Echo task's send side of the duration queue
pub type EchoPort = DurationProducer<'static, PipelineMutex, DURATION_CAPACITY>;

/// Trigger task's side of the cycle token
pub type TriggerPort = TriggerSender<'static, PipelineMutex>;

/// Converter's receive side of the duration queue
pub type DurationInPort = DurationConsumer<'static, PipelineMutex, DURATION_CAPACITY>;

/// Converter's send side of the distance queue
pub type DistanceOutPort = DistanceProducer<'static, PipelineMutex, DISTANCE_CAPACITY>;

/// Display task's side of the cycle token
pub type CyclePort = TriggerReceiver<'static, PipelineMutex>;

/// Display task's receive side of the distance queue
pub type DistanceInPort = DistanceConsumer<'static, PipelineMutex, DISTANCE_CAPACITY>;

static PIPELINE: StaticCell<Pipeline<PipelineMutex>> = StaticCell::new();

/// Create the pipeline and hand out its ports
///
/// Panics if called twice.
pub fn init() -> Ports<'static, PipelineMutex, DURATION_CAPACITY, DISTANCE_CAPACITY> {
    PIPELINE.init(Pipeline::new()).split()
}
