//! The two addressable views and path parsing.

use crate::domain::{Board, BoardId};
use crate::error::TaskifyError;
use std::{fmt, str::FromStr};

/// An addressable view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    BoardList,
    /// `/board/<id>`
    BoardDetail(BoardId),
}

impl Route {
    const BOARD_PREFIX: &'static str = "/board/";

    /// Canonical path of the route
    pub fn path(&self) -> String {
        match self {
            Self::BoardList => "/".to_string(),
            Self::BoardDetail(id) => format!("{}{}", Self::BOARD_PREFIX, id),
        }
    }
}

impl FromStr for Route {
    type Err = TaskifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = s.trim();
        let path = match path.strip_suffix('/') {
            Some(stripped) if !stripped.is_empty() => stripped,
            _ => path,
        };

        if path.is_empty() || path == "/" {
            return Ok(Self::BoardList);
        }

        match path.strip_prefix(Self::BOARD_PREFIX) {
            Some(id) if !id.is_empty() && !id.contains('/') => {
                Ok(Self::BoardDetail(BoardId::from(id)))
            }
            _ => Err(TaskifyError::InvalidRoute(s.to_string())),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// What a route resolves to against the current collection
#[derive(Debug, Clone, PartialEq)]
pub enum View<'a> {
    BoardList(&'a [Board]),
    BoardDetail(&'a Board),
    /// Unknown board id; `back` links to the board list
    NotFound { requested: BoardId, back: Route },
}

/// Resolves a route against a board collection
pub fn resolve<'a>(boards: &'a [Board], route: &Route) -> View<'a> {
    match route {
        Route::BoardList => View::BoardList(boards),
        Route::BoardDetail(id) => match boards.iter().find(|b| &b.id == id) {
            Some(board) => View::BoardDetail(board),
            None => View::NotFound {
                requested: id.clone(),
                back: Route::BoardList,
            },
        },
    }
}
