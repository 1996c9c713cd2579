use super::Rank;
use super::WorldRank;

pub trait SizedCommunicator {
    fn size(&self) -> usize;
    fn rank(&self) -> Rank;

    fn is_main(&self) -> bool {
        self.rank() == WorldRank::main()
    }

    fn all_ranks(&self) -> Vec<Rank> {
        (0i32..self.size() as i32).collect()
    }
}
