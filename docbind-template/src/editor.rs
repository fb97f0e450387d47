//! Process-wide live editor overlay, opened by a double click on rendered
//! content.
//!
//! At most one overlay exists. Activating while one is open forwards the new
//! payload to it; [`dispose`] tears it down and detaches its mount point.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use docbind_core::Value;
use thiserror::Error;

use crate::document::Document;

pub const MOUNT_POINT_ATTRIBUTE: &str = "docbind-editor-mount-point";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EditorError {
    #[error("editor failed to mount: {0}")]
    Mount(String),

    #[error("editor activated while an activation is already running")]
    Reentrant,
}

/// What the overlay is told about the content it was opened on.
#[derive(Debug, Clone)]
pub struct EditorPayload {
    pub document: Rc<Document>,
    /// Components registered alongside the content renderer.
    pub components: Vec<String>,
    pub variables: Vec<String>,
    pub slots: Vec<String>,
    /// Pointer position of the activating gesture.
    pub initial_interacted: (f64, f64),
    /// The content root the gesture landed in: the event's
    /// `currentTarget` (the host element carrying the listener), or its
    /// raw `target` when the backend reports no `currentTarget`.
    pub mount_target: Option<Value>,
}

/// The external overlay implementation.
pub trait EditorOverlay {
    fn update(&mut self, payload: EditorPayload);

    fn destroyed(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Created,
    Updated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPoint {
    pub id: u64,
    pub attribute: &'static str,
}

struct Instance {
    overlay: Box<dyn EditorOverlay>,
    mount: MountPoint,
}

thread_local! {
    static INSTANCE: RefCell<Option<Instance>> = const { RefCell::new(None) };
    static MOUNT_POINTS: RefCell<Vec<MountPoint>> = const { RefCell::new(Vec::new()) };
    static NEXT_MOUNT_ID: Cell<u64> = const { Cell::new(1) };
    static ACTIVATING: Cell<bool> = const { Cell::new(false) };
}

/// Marks an activation in progress; cleared on drop.
struct ActivationGuard;

impl ActivationGuard {
    fn enter() -> Option<Self> {
        if ACTIVATING.with(|a| a.replace(true)) {
            return None;
        }
        Some(ActivationGuard)
    }
}

impl Drop for ActivationGuard {
    fn drop(&mut self) {
        ACTIVATING.with(|a| a.set(false));
    }
}

/// Open the overlay, or update the open one.
///
/// `create` runs only when no overlay exists; if it fails, its mount point
/// is detached again so repeated attempts do not pile up mount points.
///
/// Calling `activate` from inside `create` or [`EditorOverlay::update`]
/// fails with [`EditorError::Reentrant`] and leaves the singleton as is.
pub fn activate<F>(payload: EditorPayload, create: F) -> Result<Activation, EditorError>
where
    F: FnOnce(EditorPayload, &MountPoint) -> Result<Box<dyn EditorOverlay>, EditorError>,
{
    let Some(_guard) = ActivationGuard::enter() else {
        log::warn!("nested editor activation ignored");
        return Err(EditorError::Reentrant);
    };

    // Take the instance out so overlay code never runs under a borrow.
    if let Some(mut instance) = INSTANCE.with(|i| i.borrow_mut().take()) {
        instance.overlay.update(payload);
        INSTANCE.with(|i| *i.borrow_mut() = Some(instance));
        log::debug!("editor updated");
        return Ok(Activation::Updated);
    }

    let mount = attach_mount_point();
    match create(payload, &mount) {
        Ok(overlay) => {
            log::info!("editor mounted at #{}", mount.id);
            INSTANCE.with(|i| *i.borrow_mut() = Some(Instance { overlay, mount }));
            Ok(Activation::Created)
        }
        Err(e) => {
            detach_mount_point(mount.id);
            Err(e)
        }
    }
}

/// Destroy the open overlay. Returns `false` if none was open.
pub fn dispose() -> bool {
    let Some(mut instance) = INSTANCE.with(|i| i.borrow_mut().take()) else {
        return false;
    };
    instance.overlay.destroyed();
    detach_mount_point(instance.mount.id);
    log::info!("editor destroyed");
    true
}

pub fn is_active() -> bool {
    INSTANCE.with(|i| i.borrow().is_some())
}

/// Mount points currently attached.
pub fn mount_points() -> Vec<MountPoint> {
    MOUNT_POINTS.with(|m| m.borrow().clone())
}

pub fn mount_point_count() -> usize {
    MOUNT_POINTS.with(|m| m.borrow().len())
}

fn attach_mount_point() -> MountPoint {
    let id = NEXT_MOUNT_ID.with(|n| n.replace(n.get() + 1));
    let mount = MountPoint {
        id,
        attribute: MOUNT_POINT_ATTRIBUTE,
    };
    MOUNT_POINTS.with(|m| m.borrow_mut().push(mount.clone()));
    mount
}

fn detach_mount_point(id: u64) {
    MOUNT_POINTS.with(|m| m.borrow_mut().retain(|p| p.id != id));
}
