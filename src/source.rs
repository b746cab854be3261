use std::time::Duration;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, TrySendError};

use super::chunk::FrameChunker;
use super::errors::{DeviceError, ReadError};
use super::params::CaptureParams;

const FAULT_QUEUE: usize = 16;

/// FrameSource yields fixed-size frames of mono samples in capture order,
/// blocking until the next frame is available.
pub trait FrameSource {
    fn read_frame(&mut self) -> Result<Vec<f32>, ReadError>;
}

/// Source is an audio input device.
pub struct Source {
    device: cpal::Device,
}

enum Fault {
    Overrun,
    Glitch(String),
    Closed,
}

impl Source {
    pub fn new(select_device: Option<&str>) -> Result<Self, DeviceError> {
        let device = match select_device {
            Some(device_name) => Self::list_devices()?
                .into_iter()
                .flat_map(|(_, devices)| devices)
                .find(|d| d.name().map(|name| name == device_name).unwrap_or(false))
                .ok_or_else(|| {
                    DeviceError(
                        format!("no input device with name '{}' was found", device_name),
                        None,
                    )
                })?,
            None => cpal::default_host()
                .default_input_device()
                .ok_or_else(|| DeviceError("could not get default input".to_owned(), None))?,
        };

        Ok(Self { device })
    }

    /// open starts capturing and returns the pull side of the stream.
    /// Completed frames wait in a bounded queue; when the reader falls
    /// behind, the newest frame is dropped and the loss surfaces as one
    /// transient read error.
    pub fn open(&self, params: &CaptureParams) -> Result<Capture, DeviceError> {
        let config = cpal::StreamConfig {
            buffer_size: cpal::BufferSize::Fixed(params.frame_size as u32),
            channels: params.channels,
            sample_rate: cpal::SampleRate(params.sample_rate),
        };

        let (frame_tx, frames) = bounded(params.queue_len.max(1));
        let (fault_tx, faults) = bounded(FAULT_QUEUE);
        let overrun_tx = fault_tx.clone();

        let mut chunker = FrameChunker::new(params.frame_size);
        let channels = params.channels as usize;

        let stream = self
            .device
            .build_input_stream(
                &config,
                move |data: &[f32], _: &_| {
                    chunker.push(data, channels, |frame| match frame_tx.try_send(frame) {
                        Ok(()) => {}
                        Err(TrySendError::Full(_)) => {
                            let _ = overrun_tx.try_send(Fault::Overrun);
                        }
                        Err(TrySendError::Disconnected(_)) => {}
                    });
                },
                move |err| {
                    eprintln!("Audio Stream Error: {}", err);
                    let fault = match err {
                        cpal::StreamError::DeviceNotAvailable => Fault::Closed,
                        e => Fault::Glitch(e.to_string()),
                    };
                    let _ = fault_tx.try_send(fault);
                },
            )
            .map_err(|e| DeviceError("could not build stream".to_owned(), Some(Box::new(e))))?;

        stream
            .play()
            .map_err(|e| DeviceError("failed to start stream".to_owned(), Some(Box::new(e))))?;

        Ok(Capture {
            frames,
            faults,
            poll: Duration::from_millis(params.poll_interval_ms.max(1)),
            closed: false,
            _stream: stream,
        })
    }

    pub fn list_devices(
    ) -> Result<Vec<(cpal::HostId, cpal::InputDevices<cpal::Devices>)>, DeviceError> {
        let mut hosts = Vec::new();
        for host_id in cpal::available_hosts() {
            let host = cpal::host_from_id(host_id).map_err(|e| {
                DeviceError(format!("could not get host {:?}", host_id), Some(Box::new(e)))
            })?;
            let devices = host.input_devices().map_err(|e| {
                DeviceError(
                    "could not get audio input devices".to_owned(),
                    Some(Box::new(e)),
                )
            })?;
            hosts.push((host_id, devices));
        }
        Ok(hosts)
    }

    pub fn print_devices(show_supported_configs: bool) -> Result<(), DeviceError> {
        for (host, devices) in Self::list_devices()? {
            for dev in devices {
                let name = dev.name().map_err(|e| {
                    DeviceError("error getting device name".to_owned(), Some(Box::new(e)))
                })?;
                println!("({:?}) input device: {}", host, name);
                if show_supported_configs {
                    let configs = dev
                        .supported_input_configs()
                        .map_err(|e| {
                            DeviceError(
                                "error getting input configs".to_owned(),
                                Some(Box::new(e)),
                            )
                        })?
                        .collect::<Vec<cpal::SupportedStreamConfigRange>>();
                    println!("\tsupported configs: {:#?}", &configs);
                }
            }
        }
        Ok(())
    }
}

/// Capture owns a live input stream and hands out frames in arrival order.
/// Dropping it stops the stream and releases the device.
pub struct Capture {
    frames: Receiver<Vec<f32>>,
    faults: Receiver<Fault>,
    poll: Duration,
    closed: bool,
    _stream: cpal::Stream,
}

impl Capture {
    /// close releases the device. Dropping the Capture does the same;
    /// taking self by value makes a double close unrepresentable.
    pub fn close(self) {}
}

impl FrameSource for Capture {
    fn read_frame(&mut self) -> Result<Vec<f32>, ReadError> {
        loop {
            match self.faults.try_recv() {
                Ok(Fault::Overrun) => {
                    return Err(ReadError::Transient(
                        "capture overrun, frame dropped".to_owned(),
                    ))
                }
                Ok(Fault::Glitch(msg)) => return Err(ReadError::Transient(msg)),
                Ok(Fault::Closed) => self.closed = true,
                Err(_) => {}
            }

            // drain frames that arrived before the stream went away
            if self.closed && self.frames.is_empty() {
                return Err(ReadError::Closed);
            }

            match self.frames.recv_timeout(self.poll) {
                Ok(frame) => return Ok(frame),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return Err(ReadError::Closed),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FrameSource, Source};
    use crate::params::CaptureParams;

    #[test]
    #[ignore] // needs a working audio input device
    fn captures_frames_from_the_default_device() {
        Source::print_devices(true).expect("failed to print devices");

        let source = Source::new(None).expect("failed to get device");
        let params = CaptureParams::default();
        let mut capture = source.open(&params).expect("failed to open capture");

        for _ in 0..4 {
            let frame = capture.read_frame().expect("failed to read frame");
            assert_eq!(frame.len(), params.frame_size);
        }
        capture.close();
    }
}
