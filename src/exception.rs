// Copyright (c) 2021 Marco Boneberger
// Licensed under the EUPL-1.2-or-later

//! Contains exception and Result definitions
use thiserror::Error;

/// Represents all kinds of errors the gripper subsystem can report.
#[derive(Error, Debug)]
pub enum SimException {
    /// BodyLoadException is thrown if the gripper body description cannot be loaded into the
    /// physics world. This is fatal; there is no gripper without a body.
    #[error("{message:?}")]
    BodyLoadException { message: String },

    /// WorldException is thrown when a query or command is issued against a physics world
    /// that no longer holds the referenced body, e.g. after the world was torn down.
    #[error("{message:?}")]
    WorldException { message: String },

    /// CommandException is thrown if the physics engine rejects a motor or constraint command.
    #[error("{message:?}")]
    CommandException { message: String },
}

/// Result type which can have SimException as Error
pub type SimResult<T> = Result<T, SimException>;
