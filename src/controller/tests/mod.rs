mod control;

use super::test_helpers::*;
use super::{DownloadRequest, StationDownload};
use crate::config::{Config, DestinationConfig};
use crate::error::Error;
use crate::types::{Event, Status, TaskId};
use std::sync::Arc;
use std::sync::atomic::Ordering;
