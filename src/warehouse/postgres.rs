//! Warehouse backend speaking the Postgres wire protocol.
//!
//! The city warehouse exposes a pg-wire endpoint, so the standard
//! blocking `postgres` client covers both queries. One session is held
//! for the process lifetime and replaced wholesale when a query fails;
//! the session is never explicitly closed.

use postgres::{Client, NoTls};

use crate::dimension::Dimension;
use crate::warehouse::config::{WarehouseConfig, DATABASE, SCHEMA, WAREHOUSE_HOST};
use crate::warehouse::{crosstab_sql, spatial_sql, CrossTabRow, SpatialBin, Warehouse};
use crate::{CrashmapError, Result};

/// Warehouse client over one pg-wire session.
pub struct PostgresWarehouse {
    client: Client,
    config: WarehouseConfig,
}

impl PostgresWarehouse {
    /// Open a session against the fixed database/schema and return the
    /// handle. No retry here; reconnection is the caller's call.
    pub fn connect(config: WarehouseConfig) -> Result<Self> {
        let client = open_session(&config)?;
        Ok(Self { client, config })
    }
}

fn open_session(config: &WarehouseConfig) -> Result<Client> {
    // The compute-pool id rides along as a session option; pg-compatible
    // warehouses route the session onto that pool.
    postgres::Config::new()
        .host(WAREHOUSE_HOST)
        .user(&config.user)
        .password(&config.password)
        .dbname(DATABASE)
        .options(&format!("-c search_path={SCHEMA} -c warehouse={}", config.pool))
        .connect(NoTls)
        .map_err(|e| {
            CrashmapError::Connection(format!("failed to open warehouse session: {e}"))
        })
}

impl Warehouse for PostgresWarehouse {
    fn fetch_crosstab(&mut self, x: Dimension, y: Dimension) -> Result<Vec<CrossTabRow>> {
        let sql = crosstab_sql(x, y);
        let rows = self
            .client
            .query(&sql, &[])
            .map_err(|e| CrashmapError::Query(format!("cross-tab query failed: {e}")))?;

        rows.iter()
            .map(|row| {
                Ok(CrossTabRow {
                    count: row
                        .try_get("n")
                        .map_err(|e| CrashmapError::Query(format!("bad count column: {e}")))?,
                    x: row
                        .try_get("x_axis")
                        .map_err(|e| CrashmapError::Query(format!("bad x_axis column: {e}")))?,
                    y: row
                        .try_get("y_axis")
                        .map_err(|e| CrashmapError::Query(format!("bad y_axis column: {e}")))?,
                })
            })
            .collect()
    }

    fn fetch_spatial_bins(
        &mut self,
        x: Dimension,
        x_value: f64,
        y: Dimension,
        y_value: f64,
    ) -> Result<Vec<SpatialBin>> {
        let sql = spatial_sql(x, y);
        // Clicked cell values are bind parameters; a value matching no
        // rows simply yields zero bins.
        let rows = self
            .client
            .query(&sql, &[&x_value, &y_value])
            .map_err(|e| CrashmapError::Query(format!("spatial query failed: {e}")))?;

        rows.iter()
            .map(|row| {
                Ok(SpatialBin {
                    count: row
                        .try_get("n")
                        .map_err(|e| CrashmapError::Query(format!("bad count column: {e}")))?,
                    lat: row
                        .try_get("lat_bin")
                        .map_err(|e| CrashmapError::Query(format!("bad lat_bin column: {e}")))?,
                    lon: row
                        .try_get("lon_bin")
                        .map_err(|e| CrashmapError::Query(format!("bad lon_bin column: {e}")))?,
                })
            })
            .collect()
    }

    fn reconnect(&mut self) -> Result<()> {
        // Replace, never repair: the old session is dropped whatever
        // state it is in.
        self.client = open_session(&self.config)?;
        Ok(())
    }
}
