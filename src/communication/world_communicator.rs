use super::Rank;
use crate::error::CommunicationError;

pub trait WorldCommunicator<T> {
    fn blocking_send_vec(&mut self, rank: Rank, data: &[T]) -> Result<(), CommunicationError>;
    fn receive_vec(&mut self, rank: Rank) -> Result<Vec<T>, CommunicationError>;

    /// Sends the contents of `buffer` to `destination` and overwrites
    /// it with whatever `source` sends in the same step. Does not
    /// return before the send has been handed off and the buffer has
    /// been refilled completely.
    fn send_receive_replace(
        &mut self,
        buffer: &mut [T],
        destination: Rank,
        source: Rank,
    ) -> Result<(), CommunicationError>
    where
        T: Clone,
    {
        self.blocking_send_vec(destination, buffer)?;
        let received = self.receive_vec(source)?;
        if received.len() != buffer.len() {
            return Err(CommunicationError::LengthMismatch {
                rank: source,
                expected: buffer.len(),
                received: received.len(),
            });
        }
        buffer.clone_from_slice(&received);
        Ok(())
    }
}
