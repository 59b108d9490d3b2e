use crate::error::{Error, Result};
use std::str::FromStr;

const DEFAULT_PER_PAGE: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    CreatedByMe,
    AssignedToMe,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Closed,
    Locked,
    Merged,
    Opened,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sort {
    Asc,
    Desc,
}

/// A filter flag that is either left out of the query or explicitly set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TriState {
    #[default]
    Unset,
    True,
    False,
}

/// Filters applied when listing a project's merge requests. `None` and
/// [`TriState::Unset`] fields are left out of the query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeRequestFilter {
    pub scope: Option<Scope>,
    pub state: Option<State>,
    pub is_draft: TriState,
    pub has_assignee: TriState,
    pub has_been_approved: TriState,
    pub has_reviewer: TriState,
    pub sort: Option<Sort>,
    pub per_page: Option<u32>,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::CreatedByMe => "created_by_me",
            Scope::AssignedToMe => "assigned_to_me",
            Scope::All => "all",
        }
    }
}

impl FromStr for Scope {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "created_by_me" => Ok(Scope::CreatedByMe),
            "assigned_to_me" => Ok(Scope::AssignedToMe),
            "all" => Ok(Scope::All),
            _ => Err(Error::InvalidOptions(format!("unexpected scope: {:?}", value))),
        }
    }
}

impl State {
    pub fn as_str(&self) -> &'static str {
        match self {
            State::Closed => "closed",
            State::Locked => "locked",
            State::Merged => "merged",
            State::Opened => "opened",
        }
    }
}

impl FromStr for State {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "closed" => Ok(State::Closed),
            "locked" => Ok(State::Locked),
            "merged" => Ok(State::Merged),
            "opened" => Ok(State::Opened),
            _ => Err(Error::InvalidOptions(format!("unexpected state: {:?}", value))),
        }
    }
}

impl Sort {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sort::Asc => "asc",
            Sort::Desc => "desc",
        }
    }
}

impl FromStr for Sort {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "asc" => Ok(Sort::Asc),
            "desc" => Ok(Sort::Desc),
            _ => Err(Error::InvalidOptions(format!("unexpected sort: {:?}", value))),
        }
    }
}

impl From<bool> for TriState {
    fn from(value: bool) -> Self {
        if value {
            TriState::True
        } else {
            TriState::False
        }
    }
}

impl TriState {
    fn pick(&self, yes: &'static str, no: &'static str) -> Option<&'static str> {
        match self {
            TriState::Unset => None,
            TriState::True => Some(yes),
            TriState::False => Some(no),
        }
    }
}

impl MergeRequestFilter {
    /// Open, undrafted merge requests nobody has picked up yet, oldest first.
    pub fn unattended() -> Self {
        MergeRequestFilter {
            scope: Some(Scope::All),
            state: Some(State::Opened),
            is_draft: TriState::False,
            has_assignee: TriState::False,
            has_been_approved: TriState::False,
            has_reviewer: TriState::False,
            sort: Some(Sort::Asc),
            per_page: None,
        }
    }

    pub fn to_query(&self) -> Result<Vec<(&'static str, String)>> {
        let per_page = match self.per_page {
            Some(0) => {
                return Err(Error::InvalidOptions(
                    "per_page must be greater than zero".to_owned(),
                ))
            }
            Some(per_page) => per_page,
            None => DEFAULT_PER_PAGE,
        };

        let mut query = Vec::new();

        if let Some(scope) = self.scope {
            query.push(("scope", scope.as_str().to_owned()));
        }
        if let Some(state) = self.state {
            query.push(("state", state.as_str().to_owned()));
        }
        if let Some(sort) = self.sort {
            query.push(("sort", sort.as_str().to_owned()));
        }

        let flags = [
            ("wip", self.is_draft.pick("yes", "no")),
            ("assignee_id", self.has_assignee.pick("Any", "None")),
            ("approved_by_ids", self.has_been_approved.pick("Any", "None")),
            ("reviewer_id", self.has_reviewer.pick("Any", "None")),
        ];
        for (key, value) in flags {
            if let Some(value) = value {
                query.push((key, value.to_owned()));
            }
        }

        query.push(("per_page", per_page.to_string()));

        Ok(query)
    }
}
