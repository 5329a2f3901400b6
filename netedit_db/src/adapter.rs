//! The primitive surface of a backing design database.

use netedit_common::{
    Endpoint, LibCell, NetMember, ObjectClass, ObjectRef, PinDirection, PinRef, Placement,
    PlacementStatus, PropertyKey, PropertyValue, QueryOptions,
};

use crate::DbError;

/// Primitive operations of a design database.
///
/// Every entity is addressed by name and re-resolved on each call, so callers
/// never hold references into the store between calls. Implementations are
/// single-threaded; callers serialize mutation.
pub trait DesignDb {
    // --- cells -------------------------------------------------------------

    /// Creates a cell. A black box has no pins; its `template` is only recorded
    /// as its reference name.
    ///
    /// # Errors
    ///
    /// [`DbError::DuplicateName`] if `name` exists, [`DbError::UnknownTemplate`]
    /// for a non-black-box cell whose template is missing.
    fn create_cell(&mut self, template: Option<&str>, name: &str, black_box: bool) -> Result<(), DbError>;

    /// Removes a cell, disconnecting its pins and freeing its BEL.
    ///
    /// # Errors
    ///
    /// [`DbError::NotFound`] when the cell is absent and `quiet` is false.
    fn remove_cell(&mut self, name: &str, quiet: bool) -> Result<(), DbError>;

    /// Renames a cell in place.
    ///
    /// # Errors
    ///
    /// [`DbError::NotFound`] or [`DbError::DuplicateName`].
    fn rename_cell(&mut self, name: &str, new_name: &str) -> Result<(), DbError>;

    /// Evaluates a cell query natively.
    ///
    /// # Errors
    ///
    /// [`DbError::InvalidFilter`], [`DbError::Pattern`], [`DbError::NotFound`]
    /// for missing related objects, and [`DbError::UnsupportedRelation`] for
    /// cell-to-cell relations.
    fn query_cells(&self, query: &QueryOptions) -> Result<Vec<String>, DbError>;

    // --- properties ----------------------------------------------------------

    /// Reads a property; `None` when unset.
    ///
    /// # Errors
    ///
    /// [`DbError::NotFound`] when the object does not exist.
    fn get_property(&self, object: &ObjectRef, key: &PropertyKey) -> Result<Option<PropertyValue>, DbError>;

    /// Writes a property. With `quiet`, failures are logged and swallowed.
    ///
    /// # Errors
    ///
    /// [`DbError::ReadOnlyProperty`] or [`DbError::IncompatibleProperty`]
    /// when not `quiet`.
    fn set_property(
        &mut self,
        object: &ObjectRef,
        key: &PropertyKey,
        value: PropertyValue,
        quiet: bool,
    ) -> Result<(), DbError>;

    /// Keys of every property the object reports.
    ///
    /// # Errors
    ///
    /// [`DbError::NotFound`] when the object does not exist.
    fn list_properties(&self, object: &ObjectRef) -> Result<Vec<PropertyKey>, DbError>;

    // --- connectivity --------------------------------------------------------

    /// Pins of a cell in template order, optionally filtered.
    ///
    /// # Errors
    ///
    /// [`DbError::NotFound`] when the cell does not exist.
    fn get_pins(
        &self,
        cell: &str,
        direction: Option<PinDirection>,
        connected: Option<bool>,
    ) -> Result<Vec<PinRef>, DbError>;

    /// The net a pin sits on.
    ///
    /// # Errors
    ///
    /// [`DbError::NotFound`] when the pin does not exist.
    fn pin_net(&self, pin: &PinRef) -> Result<Option<String>, DbError>;

    /// Members of a net with their roles.
    ///
    /// # Errors
    ///
    /// [`DbError::NotFound`] when the net does not exist.
    fn net_members(&self, net: &str) -> Result<Vec<NetMember>, DbError>;

    /// Adds an endpoint to a net.
    ///
    /// # Errors
    ///
    /// [`DbError::AlreadyConnected`] or [`DbError::MultipleDrivers`].
    fn connect(&mut self, net: &str, endpoint: &Endpoint) -> Result<(), DbError>;

    /// Removes endpoints from a net. Either all are removed or none.
    ///
    /// # Errors
    ///
    /// [`DbError::NotConnected`] if any endpoint is not on the net.
    fn disconnect(&mut self, net: &str, endpoints: &[Endpoint]) -> Result<(), DbError>;

    /// Creates an empty net.
    ///
    /// # Errors
    ///
    /// [`DbError::DuplicateName`] if the net exists.
    fn create_net(&mut self, name: &str) -> Result<(), DbError>;

    /// Removes a net, disconnecting its members.
    ///
    /// # Errors
    ///
    /// [`DbError::NotFound`] if the net does not exist.
    fn remove_net(&mut self, name: &str) -> Result<(), DbError>;

    /// Evaluates a net query natively.
    ///
    /// # Errors
    ///
    /// As [`DesignDb::query_cells`].
    fn query_nets(&self, query: &QueryOptions) -> Result<Vec<String>, DbError>;

    // --- placement -----------------------------------------------------------

    /// Binds a cell to a BEL, or to a free compatible BEL of a site.
    ///
    /// # Errors
    ///
    /// [`DbError::PlacementRejected`] when the engine refuses the placement.
    fn place_cell(&mut self, cell: &str, location: &ObjectRef) -> Result<Placement, DbError>;

    /// Clears a cell's placement, returning what it was bound to.
    ///
    /// # Errors
    ///
    /// [`DbError::NotFound`] when the cell does not exist.
    fn unplace_cell(&mut self, cell: &str) -> Result<Option<Placement>, DbError>;

    /// Current placement of a cell.
    ///
    /// # Errors
    ///
    /// [`DbError::NotFound`] when the cell does not exist.
    fn cell_placement(&self, cell: &str) -> Result<Option<Placement>, DbError>;

    /// Current placement status of a cell.
    ///
    /// # Errors
    ///
    /// [`DbError::NotFound`] when the cell does not exist.
    fn placement_status(&self, cell: &str) -> Result<PlacementStatus, DbError>;

    /// BELs of a site.
    ///
    /// # Errors
    ///
    /// [`DbError::NotFound`] when the site does not exist.
    fn bels_of_site(&self, site: &str) -> Result<Vec<String>, DbError>;

    // --- misc ----------------------------------------------------------------

    /// Class of an existing object.
    ///
    /// # Errors
    ///
    /// [`DbError::NotFound`] when the object does not exist.
    fn get_class(&self, object: &ObjectRef) -> Result<ObjectClass, DbError>;

    /// Library template by name.
    fn lib_cell(&self, name: &str) -> Option<&LibCell>;

    /// Ties every unconnected input pin of `cells` to a constant net.
    /// Returns the number of pins tied.
    ///
    /// # Errors
    ///
    /// [`DbError::NotFound`] when a cell does not exist.
    fn tie_unused_pins(&mut self, cells: &[String]) -> Result<usize, DbError>;
}
