/// FrameChunker regroups capture callbacks of arbitrary length into frames of
/// exactly frame_size samples. Interleaved multi-channel input is reduced to
/// its first channel. Samples are emitted in arrival order; a partial frame
/// stays pending until the callback that completes it.
pub struct FrameChunker {
    pending: Vec<f32>,
    frame_size: usize,
}

impl FrameChunker {
    pub fn new(frame_size: usize) -> FrameChunker {
        FrameChunker {
            pending: Vec::with_capacity(frame_size),
            frame_size,
        }
    }

    pub fn push<F>(&mut self, data: &[f32], channels: usize, mut emit: F)
    where
        F: FnMut(Vec<f32>),
    {
        if self.frame_size == 0 {
            return;
        }
        for &sample in data.iter().step_by(channels.max(1)) {
            self.pending.push(sample);
            if self.pending.len() == self.frame_size {
                let full = std::mem::replace(&mut self.pending, Vec::with_capacity(self.frame_size));
                emit(full);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FrameChunker;

    #[test]
    fn it_works() {
        let mut chunker = FrameChunker::new(4);
        let mut frames = Vec::new();

        chunker.push(&[0., 1., 2.], 1, |f| frames.push(f));
        assert!(frames.is_empty());

        chunker.push(&[3., 4., 5., 6., 7., 8.], 1, |f| frames.push(f));
        assert_eq!(frames, vec![vec![0., 1., 2., 3.], vec![4., 5., 6., 7.]]);
    }

    #[test]
    fn keeps_first_channel_of_interleaved_input() {
        let mut chunker = FrameChunker::new(2);
        let mut frames = Vec::new();

        chunker.push(&[1., -1., 2., -2., 3., -3., 4., -4.], 2, |f| frames.push(f));
        assert_eq!(frames, vec![vec![1., 2.], vec![3., 4.]]);
    }
}
