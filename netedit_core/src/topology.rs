//! Inserting a cell into a net.
//!
//! `insert` moves a subset of a net's sinks behind a cell: the original net
//! drives the cell's input, and a new downhill net carries the cell's output
//! to the moved sinks. Everything that can be checked is checked before the
//! first mutation. Mutations are journaled, and a backing-store failure
//! part-way through undoes the completed steps before the error is returned.

use itertools::Itertools;
use netedit_common::{Endpoint, ObjectClass, ObjectRef, PinDirection, PinRef};
use netedit_db::{DbError, DesignDb};
use tracing::{error, info, warn};

use crate::journal::{EditJournal, EditStep};
use crate::{EditError, Session};

/// Arguments of [`Session::insert`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InsertRequest {
    /// Cell to insert. When absent, or not an existing cell, a buffer named
    /// after the net is created.
    pub cell: Option<String>,
    /// Net to split.
    pub net: String,
    /// Sinks to move behind the cell; empty means all of them.
    pub sinks: Vec<Endpoint>,
    /// Input pin of the cell to use.
    pub in_pin: Option<String>,
    /// Output pin of the cell to use.
    pub out_pin: Option<String>,
    /// Name of the new net.
    pub downhill_net: Option<String>,
}

impl InsertRequest {
    /// Inserts into `net` with every choice left to the defaults.
    pub fn new(net: impl Into<String>) -> Self {
        Self {
            net: net.into(),
            ..Self::default()
        }
    }

    /// Uses an existing cell.
    #[must_use]
    pub fn cell(mut self, cell: impl Into<String>) -> Self {
        self.cell = Some(cell.into());
        self
    }

    /// Moves only these sinks.
    #[must_use]
    pub fn sinks<I>(mut self, sinks: I) -> Self
    where
        I: IntoIterator<Item = Endpoint>,
    {
        self.sinks = sinks.into_iter().collect();
        self
    }

    /// Uses this input pin.
    #[must_use]
    pub fn in_pin(mut self, pin: impl Into<String>) -> Self {
        self.in_pin = Some(pin.into());
        self
    }

    /// Uses this output pin.
    #[must_use]
    pub fn out_pin(mut self, pin: impl Into<String>) -> Self {
        self.out_pin = Some(pin.into());
        self
    }

    /// Names the new net.
    #[must_use]
    pub fn downhill_net(mut self, name: impl Into<String>) -> Self {
        self.downhill_net = Some(name.into());
        self
    }
}

/// Result of [`Session::insert`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InsertOutcome {
    /// The inserted cell.
    pub cell: String,
    /// Whether the cell was created by this insertion.
    pub created_cell: bool,
    /// Cell pin now on the original net.
    pub in_pin: PinRef,
    /// Cell pin driving the downhill net.
    pub out_pin: PinRef,
    /// The new net.
    pub downhill_net: String,
    /// Sinks moved to the downhill net.
    pub moved_sinks: Vec<Endpoint>,
}

/// Everything `insert` decided before touching the design.
struct InsertPlan {
    cell: String,
    create_from: Option<String>,
    in_pin: PinRef,
    out_pin: PinRef,
    downhill_net: String,
    next_index: Option<u64>,
    sinks: Vec<Endpoint>,
}

impl<D: DesignDb> Session<D> {
    /// Splits `request.net` so that the selected sinks are driven through a cell.
    ///
    /// Afterwards the original net keeps its driver, its unselected sinks and
    /// gains the cell's input pin. The downhill net is driven by the cell's
    /// output pin and holds the selected sinks.
    ///
    /// # Errors
    ///
    /// Validation errors ([`EditError::InvalidSinks`],
    /// [`EditError::NoAvailablePin`], [`EditError::DuplicateName`],
    /// [`EditError::NotFound`], [`EditError::InvalidArgument`]) leave the
    /// design untouched. A backing-store failure during mutation is undone and
    /// returned as [`EditError::Backing`]; if undoing fails too the result is
    /// [`EditError::Inconsistent`].
    pub fn insert(&mut self, request: &InsertRequest) -> Result<InsertOutcome, EditError> {
        let plan = self.plan_insert(request)?;
        if let Some(next) = plan.next_index {
            self.names.commit(&mut self.db, next)?;
        }

        let mut journal = EditJournal::new();
        if let Err(cause) = apply(&mut self.db, &request.net, &plan, &mut journal) {
            warn!("Insert into '{}' failed, undoing {} step(s): {}", request.net, journal.steps().len(), cause);
            return match journal.rollback(&mut self.db) {
                Ok(()) => Err(EditError::Backing(cause)),
                Err(rollback) => {
                    error!("Undo of insert into '{}' failed: {}", request.net, rollback);
                    Err(EditError::Inconsistent { cause, rollback })
                }
            };
        }

        info!(
            "Inserted '{}' into '{}' ({} -> {}), moved {} sink(s) to '{}'",
            plan.cell,
            request.net,
            plan.in_pin,
            plan.out_pin,
            plan.sinks.len(),
            plan.downhill_net
        );
        Ok(InsertOutcome {
            created_cell: plan.create_from.is_some(),
            cell: plan.cell,
            in_pin: plan.in_pin,
            out_pin: plan.out_pin,
            downhill_net: plan.downhill_net,
            moved_sinks: plan.sinks,
        })
    }

    fn plan_insert(&self, request: &InsertRequest) -> Result<InsertPlan, EditError> {
        let net = request.net.as_str();
        let members = self.db.net_members(net)?;
        let true_sinks: Vec<Endpoint> = members
            .iter()
            .filter(|m| m.is_sink())
            .map(|m| m.endpoint.clone())
            .collect();

        let sinks: Vec<Endpoint> = if request.sinks.is_empty() {
            true_sinks.clone()
        } else {
            request.sinks.iter().unique().cloned().collect()
        };
        let offenders: Vec<String> = sinks
            .iter()
            .filter(|s| !true_sinks.contains(s))
            .map(ToString::to_string)
            .collect();
        if !offenders.is_empty() {
            return Err(EditError::InvalidSinks {
                net: net.to_string(),
                offenders,
            });
        }
        if sinks.is_empty() {
            return Err(EditError::invalid_argument(format!("net '{net}' has no sinks to move")));
        }

        let existing = request.cell.as_deref().filter(|c| self.cell_exists(c));
        if let (Some(requested), None) = (request.cell.as_deref(), existing) {
            warn!("'{}' is not a cell, inserting a buffer instead", requested);
        }
        let (cell, create_from, inputs, outputs) = match existing {
            Some(cell) => (
                cell.to_string(),
                None,
                self.free_pins(cell, PinDirection::In)?,
                self.free_pins(cell, PinDirection::Out)?,
            ),
            None => {
                let cell = self.config.buffer_name(net);
                if self.cell_exists(&cell) {
                    return Err(EditError::DuplicateName {
                        class: ObjectClass::Cell,
                        name: cell,
                    });
                }
                let template = self.config.buffer_template.clone();
                let lib = self.db.lib_cell(&template).ok_or_else(|| {
                    EditError::invalid_argument(format!("buffer template '{template}' is not in the library"))
                })?;
                let pins = |direction| lib.pins_with(direction).map(|p| p.name.clone()).collect::<Vec<_>>();
                let (inputs, outputs) = (pins(PinDirection::In), pins(PinDirection::Out));
                (cell, Some(template), inputs, outputs)
            }
        };

        let in_pin = choose_pin(&cell, request.in_pin.as_deref(), &inputs, PinDirection::In)?;
        let out_pin = choose_pin(&cell, request.out_pin.as_deref(), &outputs, PinDirection::Out)?;
        if sinks.iter().any(|s| s.as_pin() == Some(&in_pin) || s.as_pin() == Some(&out_pin)) {
            return Err(EditError::invalid_argument(format!(
                "cannot move a pin of '{cell}' behind itself"
            )));
        }

        let (downhill_net, next_index) = match &request.downhill_net {
            Some(name) => {
                if self.db.get_class(&ObjectRef::net(name.as_str())).is_ok() {
                    return Err(EditError::DuplicateName {
                        class: ObjectClass::Net,
                        name: name.clone(),
                    });
                }
                (name.clone(), None)
            }
            None => {
                let (name, next) = self.names.propose(&self.db)?;
                (name, Some(next))
            }
        };

        Ok(InsertPlan {
            cell,
            create_from,
            in_pin,
            out_pin,
            downhill_net,
            next_index,
            sinks,
        })
    }

    fn free_pins(&self, cell: &str, direction: PinDirection) -> Result<Vec<String>, EditError> {
        Ok(self
            .db
            .get_pins(cell, Some(direction), Some(false))?
            .into_iter()
            .map(|p| p.pin)
            .collect())
    }
}

fn choose_pin(cell: &str, requested: Option<&str>, free: &[String], direction: PinDirection) -> Result<PinRef, EditError> {
    match requested {
        Some(pin) if free.iter().any(|p| p == pin) => Ok(PinRef::new(cell, pin)),
        Some(pin) => Err(EditError::invalid_argument(format!(
            "'{cell}/{pin}' is not an unconnected {direction} pin"
        ))),
        None => free
            .first()
            .map(|pin| PinRef::new(cell, pin.as_str()))
            .ok_or_else(|| EditError::NoAvailablePin {
                cell: cell.to_string(),
                direction,
            }),
    }
}

/// The mutation phase of an insert. Disconnection precedes every connection.
fn apply<D: DesignDb>(db: &mut D, net: &str, plan: &InsertPlan, journal: &mut EditJournal) -> Result<(), DbError> {
    if let Some(template) = &plan.create_from {
        db.create_cell(Some(template), &plan.cell, false)?;
        journal.record(EditStep::CreatedCell(plan.cell.clone()));
    }

    db.disconnect(net, &plan.sinks)?;
    journal.record(EditStep::Disconnected {
        net: net.to_string(),
        endpoints: plan.sinks.clone(),
    });

    db.create_net(&plan.downhill_net)?;
    journal.record(EditStep::CreatedNet(plan.downhill_net.clone()));

    connect(db, journal, net, &Endpoint::Pin(plan.in_pin.clone()))?;
    connect(db, journal, &plan.downhill_net, &Endpoint::Pin(plan.out_pin.clone()))?;
    for sink in &plan.sinks {
        connect(db, journal, &plan.downhill_net, sink)?;
    }
    Ok(())
}

fn connect<D: DesignDb>(db: &mut D, journal: &mut EditJournal, net: &str, endpoint: &Endpoint) -> Result<(), DbError> {
    db.connect(net, endpoint)?;
    journal.record(EditStep::Connected {
        net: net.to_string(),
        endpoint: endpoint.clone(),
    });
    Ok(())
}
