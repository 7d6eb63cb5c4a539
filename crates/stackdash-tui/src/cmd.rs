//! Deferred work returned by model updates.
//!
//! A [`Cmd`] is a batch of jobs. A job either posts a message straight back
//! to the update loop, or runs a closure off the loop and posts whatever
//! message it returns. Models never touch the loop's state from a job.

use std::fmt;

use crate::messages::Msg;

type TaskFn = Box<dyn FnOnce() -> Option<Msg> + Send>;

pub enum Job {
    /// Post this message.
    Msg(Msg),
    /// Run off the update loop, then post the result if any.
    Task(TaskFn),
}

impl fmt::Debug for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Msg(msg) => f.debug_tuple("Msg").field(msg).finish(),
            Self::Task(_) => f.write_str("Task(..)"),
        }
    }
}

#[derive(Debug, Default)]
#[must_use]
pub struct Cmd {
    jobs: Vec<Job>,
}

impl Cmd {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn msg(msg: impl Into<Msg>) -> Self {
        Self {
            jobs: vec![Job::Msg(msg.into())],
        }
    }

    pub fn task<F>(f: F) -> Self
    where
        F: FnOnce() -> Option<Msg> + Send + 'static,
    {
        Self {
            jobs: vec![Job::Task(Box::new(f))],
        }
    }

    /// Combine commands. Their jobs carry no ordering guarantee relative to
    /// each other once executed.
    pub fn batch(cmds: impl IntoIterator<Item = Cmd>) -> Self {
        Self {
            jobs: cmds.into_iter().flat_map(|c| c.jobs).collect(),
        }
    }

    /// Append another command's jobs.
    pub fn push(&mut self, other: Cmd) {
        self.jobs.extend(other.jobs);
    }

    #[must_use]
    pub fn is_none(&self) -> bool {
        self.jobs.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.is_none()
    }

    #[must_use]
    pub fn into_jobs(self) -> Vec<Job> {
        self.jobs
    }

    /// Run every job on the calling thread and collect the resulting
    /// messages in job order.
    #[must_use]
    pub fn execute(self) -> Vec<Msg> {
        self.jobs
            .into_iter()
            .filter_map(|job| match job {
                Job::Msg(msg) => Some(msg),
                Job::Task(f) => f(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_is_empty() {
        assert!(Cmd::none().is_none());
        assert!(Cmd::none().execute().is_empty());
    }

    #[test]
    fn batch_flattens_in_order() {
        let cmd = Cmd::batch([
            Cmd::msg(Msg::Tick),
            Cmd::none(),
            Cmd::task(|| Some(Msg::Quit)),
            Cmd::task(|| None),
        ]);
        assert_eq!(cmd.len(), 3);
        let msgs = cmd.execute();
        assert_eq!(msgs.len(), 2);
        assert!(matches!(msgs[0], Msg::Tick));
        assert!(matches!(msgs[1], Msg::Quit));
    }

    #[test]
    fn push_appends() {
        let mut cmd = Cmd::msg(Msg::Tick);
        cmd.push(Cmd::msg(Msg::Quit));
        assert_eq!(cmd.len(), 2);
    }
}
