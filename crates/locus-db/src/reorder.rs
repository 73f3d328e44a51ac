//! Single-step reordering of positioned definitions.

use crate::error::Result;
use crate::store::{ensure_shop, Store};
use crate::table::Table;
use chrono::Utc;
use locus_core::{
    sort_for_display, swap_with_neighbor, CustomAction, CustomField, Direction, Positioned,
    SearchFilter, ShopId,
};

impl Store {
    /// Move the search filter at `index` (display order) one step.
    pub fn move_search_filter(
        &self,
        shop: &ShopId,
        index: usize,
        direction: Direction,
    ) -> Result<Vec<SearchFilter>> {
        self.move_definition(shop, index, direction)
    }

    /// Move the custom field at `index` (display order) one step.
    pub fn move_custom_field(
        &self,
        shop: &ShopId,
        index: usize,
        direction: Direction,
    ) -> Result<Vec<CustomField>> {
        self.move_definition(shop, index, direction)
    }

    /// Move the custom action at `index` (display order) one step.
    pub fn move_custom_action(
        &self,
        shop: &ShopId,
        index: usize,
        direction: Direction,
    ) -> Result<Vec<CustomAction>> {
        self.move_definition(shop, index, direction)
    }

    /// Exchange the positions of the item at `index` and its neighbour.
    ///
    /// Both writes share one transaction. Moving the first item up or the last
    /// item down writes nothing and returns the unchanged collection.
    fn move_definition<D: Table + Positioned>(
        &self,
        shop: &ShopId,
        index: usize,
        direction: Direction,
    ) -> Result<Vec<D>> {
        let rw = self.db.rw_transaction()?;
        ensure_shop(&rw, shop)?;

        let mut items = D::load(&rw, shop)?;
        match swap_with_neighbor(&mut items, index, direction)? {
            Some((a, b)) => {
                let now = Utc::now();
                D::upsert(&rw, items[a].to_stored(now))?;
                D::upsert(&rw, items[b].to_stored(now))?;
                tracing::debug!(
                    shop = %shop,
                    kind = D::KIND.as_str(),
                    moved = %items[a].id(),
                    swapped_with = %items[b].id(),
                    "positions swapped"
                );
            }
            None => {
                tracing::debug!(shop = %shop, kind = D::KIND.as_str(), index, "move at boundary");
            }
        }

        sort_for_display(&mut items);
        rw.commit()?;
        Ok(items)
    }
}
