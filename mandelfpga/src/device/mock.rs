use std::collections::VecDeque;
use std::time::{Duration, Instant};

use super::BulkTransport;

/// Replays scripted IN transfers and records OUT transfers. Once the script
/// runs out every read times out, like an idle device.
pub(crate) struct MockTransport {
    script: VecDeque<rusb::Result<Vec<u8>>>,
    fail_writes: bool,
    pub written: Vec<(u8, Vec<u8>)>,
    pub reads: Vec<u8>,
    pub read_times: Vec<Instant>,
}

impl MockTransport {
    pub fn new(script: Vec<rusb::Result<Vec<u8>>>) -> Self {
        Self {
            script: script.into(),
            fail_writes: false,
            written: Vec::new(),
            reads: Vec::new(),
            read_times: Vec::new(),
        }
    }

    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }
}

impl BulkTransport for MockTransport {
    fn write_bulk(&mut self, endpoint: u8, buf: &[u8], _timeout: Duration) -> rusb::Result<usize> {
        if self.fail_writes {
            return Err(rusb::Error::NoDevice);
        }
        self.written.push((endpoint, buf.to_vec()));
        Ok(buf.len())
    }

    fn read_bulk(
        &mut self,
        endpoint: u8,
        buf: &mut [u8],
        _timeout: Duration,
    ) -> rusb::Result<usize> {
        self.reads.push(endpoint);
        self.read_times.push(Instant::now());

        match self.script.pop_front() {
            None => Err(rusb::Error::Timeout),
            Some(Err(e)) => Err(e),
            Some(Ok(mut chunk)) => {
                let len = chunk.len().min(buf.len());
                buf[..len].copy_from_slice(&chunk[..len]);
                if len < chunk.len() {
                    let rest = chunk.split_off(len);
                    self.script.push_front(Ok(rest));
                }
                Ok(len)
            }
        }
    }
}
