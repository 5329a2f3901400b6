#![allow(dead_code)]

use std::sync::Once;

use netedit_core::prelude::*;
use netedit_db::GROUND_NET;

// Ensure logging only initializes once across all tests
static INIT: Once = Once::new();

pub fn setup_test_logging() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Assert that an invariant holds
#[macro_export]
macro_rules! assert_invariant {
    ($cond:expr, $invariant_name:expr) => {
        if !$cond {
            panic!(
                "Invariant violated: {}\nCondition: {}",
                $invariant_name,
                stringify!($cond)
            );
        }
    };
}

pub fn library() -> Vec<LibCell> {
    vec![
        LibCell::new("BUF").input("I").output("O").placeable_on("LUT6"),
        LibCell::new("INV").input("I").output("O").placeable_on("LUT6"),
        LibCell::new("LUT2")
            .input("I0")
            .input("I1")
            .output("O")
            .placeable_on("LUT6")
            .property("INIT", 0_i64),
        LibCell::new("FDRE")
            .input("C")
            .input("D")
            .input_tie_high("CE")
            .input("R")
            .output("Q")
            .placeable_on("FF")
            .property("INIT", 0_i64),
        LibCell::new("wrapper").hierarchical(),
    ]
}

/// A design with the library and one slice of fabric, no cells.
pub fn empty_design() -> MemoryDesign {
    let mut d = MemoryDesign::new("top");
    for lib in library() {
        d.add_lib_cell(lib);
    }
    d.add_tile("CLB_X0Y0").unwrap();
    d.add_site("SLICE_X0Y0", "SLICEL", Some("CLB_X0Y0")).unwrap();
    d.add_bel("SLICE_X0Y0", "A6LUT", "LUT6").unwrap();
    d.add_bel("SLICE_X0Y0", "B6LUT", "LUT6").unwrap();
    d.add_bel("SLICE_X0Y0", "AFF", "FF").unwrap();
    d.add_bel("SLICE_X0Y0", "BFF", "FF").unwrap();
    d.add_port("clk", PortDirection::Input).unwrap();
    d.add_port("dout", PortDirection::Output).unwrap();
    d
}

pub fn open<D: DesignDb>(db: D) -> Session<D> {
    setup_test_logging();
    Session::open(db, Config::default()).unwrap()
}

/// Net `N` driven by `D/O` with sinks `A/I`, `B/I`, `C/I`.
pub fn fanout_design() -> MemoryDesign {
    let mut d = empty_design();
    for cell in ["D", "A", "B", "C"] {
        d.create_cell(Some("BUF"), cell, false).unwrap();
    }
    d.create_net("N").unwrap();
    d.connect("N", &Endpoint::pin("D", "O")).unwrap();
    for sink in ["A", "B", "C"] {
        d.connect("N", &Endpoint::pin(sink, "I")).unwrap();
    }
    d
}

/// Net `N` driven by `D/O` with `n` buffer sinks `S0/I` .. `S<n-1>/I`
/// and the output port `dout`.
pub fn wide_fanout_design(n: usize) -> MemoryDesign {
    let mut d = empty_design();
    d.create_cell(Some("BUF"), "D", false).unwrap();
    d.create_net("N").unwrap();
    d.connect("N", &Endpoint::pin("D", "O")).unwrap();
    for i in 0..n {
        let name = format!("S{i}");
        d.create_cell(Some("BUF"), &name, false).unwrap();
        d.connect("N", &Endpoint::pin(name.as_str(), "I")).unwrap();
    }
    d.connect("N", &Endpoint::port("dout")).unwrap();
    d
}

/// `top` holding `top/lut`, `top/ff` and `top/sub` with `top/sub/ff`, plus a
/// top-level `ff`.
pub fn hierarchical_design() -> MemoryDesign {
    let mut d = empty_design();
    for (template, name) in [
        ("wrapper", "top"),
        ("LUT2", "top/lut"),
        ("FDRE", "top/ff"),
        ("wrapper", "top/sub"),
        ("FDRE", "top/sub/ff"),
        ("FDRE", "ff"),
    ] {
        d.create_cell(Some(template), name, false).unwrap();
    }
    d
}

pub fn sinks_of<D: DesignDb>(db: &D, net: &str) -> Vec<Endpoint> {
    db.net_members(net)
        .unwrap()
        .into_iter()
        .filter(|m| m.is_sink())
        .map(|m| m.endpoint)
        .collect()
}

pub fn drivers_of<D: DesignDb>(db: &D, net: &str) -> Vec<Endpoint> {
    db.net_members(net)
        .unwrap()
        .into_iter()
        .filter(|m| m.is_driver())
        .map(|m| m.endpoint)
        .collect()
}

/// Net membership with members sorted, for before/after comparisons.
pub fn connectivity(db: &MemoryDesign) -> Vec<(String, Vec<Endpoint>)> {
    db.net_names()
        .map(|net| {
            let mut members: Vec<Endpoint> = db.net_members(net).unwrap().into_iter().map(|m| m.endpoint).collect();
            members.sort();
            (net.to_string(), members)
        })
        .filter(|(net, _)| net != GROUND_NET)
        .collect()
}

// ---------------------------------------------------------------------------
// Fault injection
// ---------------------------------------------------------------------------

/// A primitive whose calls can be made to fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fault {
    Connect,
    Disconnect,
    CreateNet,
    CreateCell,
    RemoveNet,
}

/// Wraps a design and fails the `nth` call (zero-based) of chosen primitives.
#[derive(Debug)]
pub struct FaultyDb {
    pub inner: MemoryDesign,
    faults: Vec<(Fault, usize)>,
    calls: Vec<(Fault, usize)>,
}

impl FaultyDb {
    pub fn new(inner: MemoryDesign) -> Self {
        Self {
            inner,
            faults: Vec::new(),
            calls: Vec::new(),
        }
    }

    #[must_use]
    pub fn fail(mut self, fault: Fault, nth: usize) -> Self {
        self.faults.push((fault, nth));
        self
    }

    fn check(&mut self, fault: Fault) -> Result<(), DbError> {
        let count = match self.calls.iter_mut().find(|(f, _)| *f == fault) {
            Some((_, count)) => {
                *count += 1;
                *count - 1
            }
            None => {
                self.calls.push((fault, 1));
                0
            }
        };
        if self.faults.contains(&(fault, count)) {
            return Err(DbError::Io(std::io::Error::other(format!(
                "injected {fault:?} failure"
            ))));
        }
        Ok(())
    }
}

impl DesignDb for FaultyDb {
    fn create_cell(&mut self, template: Option<&str>, name: &str, black_box: bool) -> Result<(), DbError> {
        self.check(Fault::CreateCell)?;
        self.inner.create_cell(template, name, black_box)
    }

    fn remove_cell(&mut self, name: &str, quiet: bool) -> Result<(), DbError> {
        self.inner.remove_cell(name, quiet)
    }

    fn rename_cell(&mut self, name: &str, new_name: &str) -> Result<(), DbError> {
        self.inner.rename_cell(name, new_name)
    }

    fn query_cells(&self, query: &QueryOptions) -> Result<Vec<String>, DbError> {
        self.inner.query_cells(query)
    }

    fn get_property(&self, object: &ObjectRef, key: &PropertyKey) -> Result<Option<PropertyValue>, DbError> {
        self.inner.get_property(object, key)
    }

    fn set_property(
        &mut self,
        object: &ObjectRef,
        key: &PropertyKey,
        value: PropertyValue,
        quiet: bool,
    ) -> Result<(), DbError> {
        self.inner.set_property(object, key, value, quiet)
    }

    fn list_properties(&self, object: &ObjectRef) -> Result<Vec<PropertyKey>, DbError> {
        self.inner.list_properties(object)
    }

    fn get_pins(
        &self,
        cell: &str,
        direction: Option<PinDirection>,
        connected: Option<bool>,
    ) -> Result<Vec<PinRef>, DbError> {
        self.inner.get_pins(cell, direction, connected)
    }

    fn pin_net(&self, pin: &PinRef) -> Result<Option<String>, DbError> {
        self.inner.pin_net(pin)
    }

    fn net_members(&self, net: &str) -> Result<Vec<netedit_common::NetMember>, DbError> {
        self.inner.net_members(net)
    }

    fn connect(&mut self, net: &str, endpoint: &Endpoint) -> Result<(), DbError> {
        self.check(Fault::Connect)?;
        self.inner.connect(net, endpoint)
    }

    fn disconnect(&mut self, net: &str, endpoints: &[Endpoint]) -> Result<(), DbError> {
        self.check(Fault::Disconnect)?;
        self.inner.disconnect(net, endpoints)
    }

    fn create_net(&mut self, name: &str) -> Result<(), DbError> {
        self.check(Fault::CreateNet)?;
        self.inner.create_net(name)
    }

    fn remove_net(&mut self, name: &str) -> Result<(), DbError> {
        self.check(Fault::RemoveNet)?;
        self.inner.remove_net(name)
    }

    fn query_nets(&self, query: &QueryOptions) -> Result<Vec<String>, DbError> {
        self.inner.query_nets(query)
    }

    fn place_cell(&mut self, cell: &str, location: &ObjectRef) -> Result<Placement, DbError> {
        self.inner.place_cell(cell, location)
    }

    fn unplace_cell(&mut self, cell: &str) -> Result<Option<Placement>, DbError> {
        self.inner.unplace_cell(cell)
    }

    fn cell_placement(&self, cell: &str) -> Result<Option<Placement>, DbError> {
        self.inner.cell_placement(cell)
    }

    fn placement_status(&self, cell: &str) -> Result<PlacementStatus, DbError> {
        self.inner.placement_status(cell)
    }

    fn bels_of_site(&self, site: &str) -> Result<Vec<String>, DbError> {
        self.inner.bels_of_site(site)
    }

    fn get_class(&self, object: &ObjectRef) -> Result<ObjectClass, DbError> {
        self.inner.get_class(object)
    }

    fn lib_cell(&self, name: &str) -> Option<&LibCell> {
        self.inner.lib_cell(name)
    }

    fn tie_unused_pins(&mut self, cells: &[String]) -> Result<usize, DbError> {
        self.inner.tie_unused_pins(cells)
    }
}
