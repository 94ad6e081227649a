//! Byte counting for upload progress.

use bytes::Bytes;

/// Turns byte counts into non-decreasing whole percentages.
#[derive(Debug, Clone)]
pub struct ProgressMeter {
    total: u64,
    sent: u64,
    last: Option<u8>,
}

impl ProgressMeter {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            sent: 0,
            last: None,
        }
    }

    /// Record `bytes` more sent. Returns the new percentage when it moved.
    pub fn advance(&mut self, bytes: u64) -> Option<u8> {
        self.sent = self.sent.saturating_add(bytes).min(self.total);
        let percent = if self.total == 0 {
            100
        } else {
            (self.sent as u128 * 100 / self.total as u128) as u8
        };
        if self.last.map_or(true, |last| percent > last) {
            self.last = Some(percent);
            Some(percent)
        } else {
            None
        }
    }
}

/// Lazily split `data` into slices of at most `chunk_size` bytes without
/// copying.
pub fn split_chunks(data: &Bytes, chunk_size: usize) -> impl Iterator<Item = Bytes> + Send + 'static {
    let data = data.clone();
    let chunk_size = chunk_size.max(1);
    (0..data.len())
        .step_by(chunk_size)
        .map(move |start| data.slice(start..(start + chunk_size).min(data.len())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_meter_reports_changes_only() {
        let mut meter = ProgressMeter::new(1000);
        assert_eq!(meter.advance(1), Some(0));
        assert_eq!(meter.advance(4), None);
        assert_eq!(meter.advance(5), Some(1));
        assert_eq!(meter.advance(490), Some(50));
        assert_eq!(meter.advance(10_000), Some(100));
        assert_eq!(meter.advance(1), None);
    }

    #[test]
    fn test_meter_empty_total() {
        let mut meter = ProgressMeter::new(0);
        assert_eq!(meter.advance(0), Some(100));
        assert_eq!(meter.advance(0), None);
    }

    #[test]
    fn test_split_chunks() {
        let data = Bytes::from(vec![7u8; 10]);
        let sizes: Vec<usize> = split_chunks(&data, 4).map(|c| c.len()).collect();
        assert_eq!(sizes, vec![4, 4, 2]);
        assert_eq!(split_chunks(&Bytes::new(), 4).count(), 0);
        assert_eq!(split_chunks(&data, 0).count(), 10);
    }

    #[test]
    fn test_split_chunks_is_lazy() {
        let data = Bytes::from(vec![0u8; 1 << 20]);
        let mut chunks = split_chunks(&data, 1);
        assert_eq!(chunks.size_hint(), (1 << 20, Some(1 << 20)));
        assert_eq!(chunks.next().map(|c| c.len()), Some(1));
    }
}
