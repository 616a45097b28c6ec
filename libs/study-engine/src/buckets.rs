//! Reassignable id-set containers.
//!
//! Profile buckets and session pools share the same shape: several named
//! lists of card ids where one id lives in at most one list. The trait
//! below is the single implementation of remove/reassign used for both.

use uuid::Uuid;

use crate::models::{FlashcardBuckets, StudySession};

/// A container of disjoint id pools.
pub trait CardPools {
    /// Selector for one pool within the container.
    type Pool: Copy;

    fn pool(&self, pool: Self::Pool) -> &Vec<Uuid>;
    fn pool_mut(&mut self, pool: Self::Pool) -> &mut Vec<Uuid>;
    fn pools_mut(&mut self) -> Vec<&mut Vec<Uuid>>;

    /// Remove the id from every pool. Returns true if it was present.
    fn remove(&mut self, id: Uuid) -> bool {
        let mut removed = false;
        for pool in self.pools_mut() {
            if let Some(index) = pool.iter().position(|x| *x == id) {
                pool.remove(index);
                removed = true;
            }
        }
        removed
    }

    /// Remove the id everywhere, then add it to the target pool. Keeps the
    /// "at most one pool" invariant under repeated calls.
    fn reassign(&mut self, id: Uuid, to: Self::Pool) {
        self.remove(id);
        self.pool_mut(to).push(id);
    }

    fn contains(&self, pool: Self::Pool, id: Uuid) -> bool {
        self.pool(pool).contains(&id)
    }
}

/// Profile bucket selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    New,
    ToStudy,
    Perfected,
    Blacklist,
}

impl CardPools for FlashcardBuckets {
    type Pool = Bucket;

    fn pool(&self, pool: Bucket) -> &Vec<Uuid> {
        match pool {
            Bucket::New => &self.new,
            Bucket::ToStudy => &self.to_study,
            Bucket::Perfected => &self.perfected,
            Bucket::Blacklist => &self.blacklist,
        }
    }

    fn pool_mut(&mut self, pool: Bucket) -> &mut Vec<Uuid> {
        match pool {
            Bucket::New => &mut self.new,
            Bucket::ToStudy => &mut self.to_study,
            Bucket::Perfected => &mut self.perfected,
            Bucket::Blacklist => &mut self.blacklist,
        }
    }

    fn pools_mut(&mut self) -> Vec<&mut Vec<Uuid>> {
        vec![
            &mut self.new,
            &mut self.to_study,
            &mut self.perfected,
            &mut self.blacklist,
        ]
    }
}

/// Session pool selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPool {
    New,
    Review,
    Repeat,
}

impl CardPools for StudySession {
    type Pool = SessionPool;

    fn pool(&self, pool: SessionPool) -> &Vec<Uuid> {
        match pool {
            SessionPool::New => &self.new_cards,
            SessionPool::Review => &self.review_cards,
            SessionPool::Repeat => &self.repeat_cards,
        }
    }

    fn pool_mut(&mut self, pool: SessionPool) -> &mut Vec<Uuid> {
        match pool {
            SessionPool::New => &mut self.new_cards,
            SessionPool::Review => &mut self.review_cards,
            SessionPool::Repeat => &mut self.repeat_cards,
        }
    }

    fn pools_mut(&mut self) -> Vec<&mut Vec<Uuid>> {
        vec![
            &mut self.new_cards,
            &mut self.review_cards,
            &mut self.repeat_cards,
        ]
    }
}
