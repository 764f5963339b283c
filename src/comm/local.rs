use crossbeam_channel::{Receiver, Sender, unbounded};
use log::trace;

use super::{Packet, Transport, unpack_pixels, unpack_scalars};
use crate::canvas::Pixel;
use crate::error::CommError;

/// In-process rank group: every rank is a thread, every ordered pair of ranks
/// has its own unbounded FIFO channel.
pub struct LocalGroup;

/// One rank's endpoints into a `LocalGroup`.
pub struct LocalTransport {
    rank: usize,
    to: Vec<Sender<Packet>>,
    from: Vec<Receiver<Packet>>,
}

impl LocalGroup {
    /// Builds the endpoints for `n` ranks, indexed by rank.
    pub fn new(n: usize) -> Vec<LocalTransport> {
        // to[src][dst] and from[dst][src] are the two ends of one channel.
        let mut to: Vec<Vec<Sender<Packet>>> = (0..n).map(|_| Vec::with_capacity(n)).collect();
        let mut from: Vec<Vec<Receiver<Packet>>> = (0..n).map(|_| Vec::with_capacity(n)).collect();
        for src in 0..n {
            for dst in 0..n {
                let (tx, rx) = unbounded();
                to[src].push(tx);
                from[dst].push(rx);
            }
        }
        trace!("local group of {n} ranks, {} channels", n * n);

        to.into_iter()
            .zip(from)
            .enumerate()
            .map(|(rank, (to, from))| LocalTransport { rank, to, from })
            .collect()
    }

    /// Runs `f` once per rank on its own thread and returns the results in rank order.
    pub fn run<T, F>(n: usize, f: F) -> Vec<T>
    where
        T: Send,
        F: Fn(LocalTransport) -> T + Sync,
    {
        let transports = Self::new(n);
        std::thread::scope(|scope| {
            let handles: Vec<_> = transports
                .into_iter()
                .map(|t| {
                    let f = &f;
                    scope.spawn(move || f(t))
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
                .collect()
        })
    }
}

impl LocalTransport {
    fn sender(&self, peer: usize) -> Result<&Sender<Packet>, CommError> {
        self.to.get(peer).ok_or(CommError::NoSuchRank {
            peer,
            size: self.to.len(),
        })
    }

    fn receive(&self, peer: usize) -> Result<Packet, CommError> {
        let rx = self.from.get(peer).ok_or(CommError::NoSuchRank {
            peer,
            size: self.from.len(),
        })?;
        rx.recv().map_err(|_| CommError::Disconnected { peer })
    }

    fn post(&self, peer: usize, packet: Packet) -> Result<(), CommError> {
        self.sender(peer)?
            .send(packet)
            .map_err(|_| CommError::Disconnected { peer })
    }
}

impl Transport for LocalTransport {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.to.len()
    }

    fn sendrecv(
        &self,
        send: &[f64],
        dest: Option<usize>,
        recv: &mut [f64],
        source: Option<usize>,
    ) -> Result<(), CommError> {
        if let Some(dest) = dest {
            self.post(dest, Packet::Scalars(send.to_vec()))?;
        }
        if let Some(source) = source {
            unpack_scalars(self.receive(source)?, source, recv)?;
        }
        Ok(())
    }

    fn send_pixels(&self, pixels: &[Pixel], dest: usize) -> Result<(), CommError> {
        self.post(dest, Packet::Pixels(pixels.to_vec()))
    }

    fn recv_pixels(&self, source: usize, out: &mut [Pixel]) -> Result<(), CommError> {
        unpack_pixels(self.receive(source)?, source, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_shift() {
        let got = LocalGroup::run(4, |t| {
            let n = t.size();
            let me = t.rank();
            let mut recv = [0.0];
            t.sendrecv(&[me as f64], Some((me + 1) % n), &mut recv, Some((me + n - 1) % n))
                .unwrap();
            recv[0]
        });
        assert_eq!(got, vec![3.0, 0.0, 1.0, 2.0]);
    }

    #[test]
    fn messages_from_one_peer_arrive_in_order() {
        let mut ranks = LocalGroup::new(2);
        let b = ranks.pop().unwrap();
        let a = ranks.pop().unwrap();
        a.sendrecv(&[1.0], Some(1), &mut [], None).unwrap();
        a.sendrecv(&[2.0], Some(1), &mut [], None).unwrap();
        let mut r = [0.0];
        b.sendrecv(&[], None, &mut r, Some(0)).unwrap();
        assert_eq!(r, [1.0]);
        b.sendrecv(&[], None, &mut r, Some(0)).unwrap();
        assert_eq!(r, [2.0]);
    }

    #[test]
    fn departed_peer_is_reported_not_awaited() {
        let mut ranks = LocalGroup::new(2);
        let b = ranks.pop().unwrap();
        drop(ranks);
        let mut out = [Pixel::background(crate::canvas::Rgb::BLACK)];
        let err = b.recv_pixels(0, &mut out).unwrap_err();
        assert!(matches!(err, CommError::Disconnected { peer: 0 }));
    }
}
