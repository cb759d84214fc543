use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageError {
    #[error("A note holds at most {max} pages")]
    Capacity { max: usize },

    #[error("A note must keep at least one page")]
    LastPage,
}
