//! PostgreSQL-backed `HotelRepository` implementation using Diesel ORM.
//!
//! Hotels are always read joined to their chain so the domain type carries
//! the chain name.

use async_trait::async_trait;
use diesel::dsl::{AsSelect, InnerJoin, IntoBoxed, Select};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{HotelRepository, HotelRepositoryError};
use crate::domain::{
    CatalogueSort, Hotel, HotelChain, HotelChainId, HotelDeletion, HotelDraft, HotelId, HotelSort,
};

use super::diesel_basic_error_mapping::{
    ConstraintKind, map_basic_pool_error, map_constrained_diesel_error,
};
use super::models::{HotelChainRow, HotelRow, HotelValues};
use super::pool::{DbPool, PoolError};
use super::schema::{booking, hotel, hotel_chain};

/// Diesel-backed implementation of the hotel repository port.
#[derive(Clone)]
pub struct DieselHotelRepository {
    pool: DbPool,
}

impl DieselHotelRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> HotelRepositoryError {
    map_basic_pool_error(error, HotelRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> HotelRepositoryError {
    map_constrained_diesel_error(
        error,
        HotelRepositoryError::query,
        HotelRepositoryError::connection,
        |kind| {
            HotelRepositoryError::constraint(match kind {
                ConstraintKind::StillReferenced => "This hotel still has rentals.",
                ConstraintKind::MissingReference => "Hotel chain not found.",
                ConstraintKind::Duplicate | ConstraintKind::Check => {
                    "The hotel details were rejected."
                }
            })
        },
    )
}

fn row_to_hotel((row, chain_name): (HotelRow, String)) -> Result<Hotel, HotelRepositoryError> {
    row.into_hotel(chain_name)
        .map_err(|err| HotelRepositoryError::query(err.to_string()))
}

fn values(draft: &HotelDraft) -> HotelValues<'_> {
    HotelValues {
        hotel_name: draft.name(),
        address: draft.address(),
        hotel_chain_id: draft.chain_id().get(),
        category: draft.category().as_str(),
        num_rooms: draft.num_rooms(),
        rating: draft.rating(),
    }
}

async fn load_hotel(
    conn: &mut AsyncPgConnection,
    id: i32,
) -> QueryResult<Option<(HotelRow, String)>> {
    hotel::table
        .inner_join(hotel_chain::table)
        .filter(hotel::hotel_id.eq(id))
        .select((HotelRow::as_select(), hotel_chain::chain_name))
        .first::<(HotelRow, String)>(conn)
        .await
        .optional()
}

/// Hotels joined to their chain, boxed so the ordering can vary.
type BoxedHotels = IntoBoxed<
    'static,
    Select<
        InnerJoin<hotel::table, hotel_chain::table>,
        (AsSelect<HotelRow, Pg>, hotel_chain::chain_name),
    >,
    Pg,
>;

fn hotel_query() -> BoxedHotels {
    hotel::table
        .inner_join(hotel_chain::table)
        .select((HotelRow::as_select(), hotel_chain::chain_name))
        .into_boxed()
}

impl DieselHotelRepository {
    async fn load_ordered(&self, query: BoxedHotels) -> Result<Vec<Hotel>, HotelRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<(HotelRow, String)> = query
            .then_order_by(hotel::hotel_id.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_hotel).collect()
    }
}

#[async_trait]
impl HotelRepository for DieselHotelRepository {
    async fn list_chains(&self) -> Result<Vec<HotelChain>, HotelRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<HotelChainRow> = hotel_chain::table
            .order((hotel_chain::chain_name, hotel_chain::hotel_chain_id))
            .select(HotelChainRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(HotelChain::from).collect())
    }

    async fn chain_exists(&self, id: HotelChainId) -> Result<bool, HotelRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(hotel_chain::table.find(id.get())))
            .get_result::<bool>(&mut conn)
            .await
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: HotelId) -> Result<Option<Hotel>, HotelRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = load_hotel(&mut conn, id.get())
            .await
            .map_err(map_diesel_error)?;
        row.map(row_to_hotel).transpose()
    }

    async fn list(&self, sort: HotelSort) -> Result<Vec<Hotel>, HotelRepositoryError> {
        let query = hotel_query();
        let query = match sort {
            HotelSort::Id => query,
            HotelSort::Name => query.order(hotel::hotel_name.asc()),
            HotelSort::Address => query.order(hotel::address.asc()),
            HotelSort::Category => query.order(hotel::category.asc()),
            HotelSort::NumRooms => query.order(hotel::num_rooms.desc()),
            HotelSort::Rating => query.order(hotel::rating.desc()),
        };
        self.load_ordered(query).await
    }

    async fn catalogue(&self, sort: CatalogueSort) -> Result<Vec<Hotel>, HotelRepositoryError> {
        let query = hotel_query();
        let query = match sort {
            CatalogueSort::NameAsc => query.order(hotel::hotel_name.asc()),
            CatalogueSort::NameDesc => query.order(hotel::hotel_name.desc()),
            CatalogueSort::RatingDesc => query.order(hotel::rating.desc()),
            CatalogueSort::RatingAsc => query.order(hotel::rating.asc()),
            CatalogueSort::ChainAsc => query.order(hotel_chain::chain_name.asc()),
            CatalogueSort::ChainDesc => query.order(hotel_chain::chain_name.desc()),
            CatalogueSort::CategoryAsc => query.order(hotel::category.asc()),
            CatalogueSort::CategoryDesc => query.order(hotel::category.desc()),
        };
        self.load_ordered(query.then_order_by(hotel::hotel_name.asc()))
            .await
    }

    async fn insert(&self, draft: &HotelDraft) -> Result<Hotel, HotelRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = diesel::insert_into(hotel::table)
            .values(&values(draft))
            .returning(hotel::hotel_id)
            .get_result::<i32>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let row = load_hotel(&mut conn, id)
            .await
            .map_err(map_diesel_error)?
            .ok_or_else(|| HotelRepositoryError::query("inserted hotel vanished"))?;
        row_to_hotel(row)
    }

    async fn update(
        &self,
        id: HotelId,
        draft: &HotelDraft,
    ) -> Result<Option<Hotel>, HotelRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changed = diesel::update(hotel::table.find(id.get()))
            .set(&values(draft))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if changed == 0 {
            return Ok(None);
        }
        let row = load_hotel(&mut conn, id.get())
            .await
            .map_err(map_diesel_error)?;
        row.map(row_to_hotel).transpose()
    }

    async fn delete_if_unbooked(&self, id: HotelId) -> Result<HotelDeletion, HotelRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let key = id.get();
        conn.transaction(|conn| {
            async move {
                let exists = diesel::select(diesel::dsl::exists(hotel::table.find(key)))
                    .get_result::<bool>(conn)
                    .await?;
                if !exists {
                    return Ok(HotelDeletion::NotFound);
                }
                let booked = diesel::select(diesel::dsl::exists(
                    booking::table.filter(booking::hotel_id.eq(key)),
                ))
                .get_result::<bool>(conn)
                .await?;
                if booked {
                    return Ok(HotelDeletion::HasBookings);
                }
                diesel::delete(hotel::table.find(key)).execute(conn).await?;
                Ok(HotelDeletion::Deleted)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
