// Copyright (c) 2023 Graphcore Ltd. All rights reserved.

//! Support for the `dphil-sim` application.

pub mod config;
