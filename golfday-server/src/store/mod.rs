pub mod id;

use golfday_api::id::{EntrantId, MatchId, PhotoId, RecordId, TeamId, TournamentId, UserId};
use golfday_api::photos::Photo;
use golfday_api::records::{GolfRecord, RecordKind};
use golfday_api::teams::ExecutiveTeam;
use golfday_api::tournaments::entrants::Entrant;
use golfday_api::tournaments::matches::{Match, MatchStatus};
use golfday_api::tournaments::{Tournament, TournamentKind, TournamentOverview, TournamentStatus};
use golfday_api::users::User;

use sqlx::mysql::MySqlPool;
use sqlx::Row;

use futures::TryStreamExt;

use crate::Error;

macro_rules! get_one {
    ($query:expr) => {
        match $query {
            Ok(v) => v,
            Err(sqlx::Error::RowNotFound) => return Ok(None),
            Err(err) => return Err(err.into()),
        }
    };
}

#[derive(Clone, Debug)]
pub struct Store {
    pub pool: MySqlPool,
    pub table_prefix: String,
}

impl Store {
    #[inline]
    pub fn users(&self) -> UsersClient<'_> {
        UsersClient { store: self }
    }

    #[inline]
    pub fn tournaments(&self) -> TournamentsClient<'_> {
        TournamentsClient { store: self }
    }

    #[inline]
    pub fn entrants(&self, id: TournamentId) -> EntrantsClient<'_> {
        EntrantsClient { store: self, id }
    }

    #[inline]
    pub fn matches(&self, id: TournamentId) -> MatchesClient<'_> {
        MatchesClient { store: self, id }
    }

    #[inline]
    pub fn records(&self) -> RecordsClient<'_> {
        RecordsClient { store: self }
    }

    #[inline]
    pub fn teams(&self) -> TeamsClient<'_> {
        TeamsClient { store: self }
    }

    #[inline]
    pub fn photos(&self) -> PhotosClient<'_> {
        PhotosClient { store: self }
    }

    /// Creates all tables if they don't exist yet.
    pub async fn create_tables(&self) -> Result<(), Error> {
        let p = &self.table_prefix;

        let tables = [
            format!(
                "CREATE TABLE IF NOT EXISTS {}users (
                    id BIGINT UNSIGNED PRIMARY KEY,
                    name TEXT NOT NULL,
                    department TEXT NOT NULL,
                    phone TEXT,
                    email TEXT,
                    position TEXT
                )",
                p
            ),
            format!(
                "CREATE TABLE IF NOT EXISTS {}tournaments (
                    id BIGINT UNSIGNED PRIMARY KEY,
                    name TEXT NOT NULL,
                    kind TINYINT UNSIGNED NOT NULL,
                    status TINYINT UNSIGNED NOT NULL,
                    date TIMESTAMP NOT NULL
                )",
                p
            ),
            format!(
                "CREATE TABLE IF NOT EXISTS {}entrants (
                    id BIGINT UNSIGNED PRIMARY KEY,
                    tournament_id BIGINT UNSIGNED NOT NULL,
                    user_id BIGINT UNSIGNED NOT NULL,
                    seed INT UNSIGNED NOT NULL
                )",
                p
            ),
            format!(
                "CREATE TABLE IF NOT EXISTS {}matches (
                    id BIGINT UNSIGNED PRIMARY KEY,
                    tournament_id BIGINT UNSIGNED NOT NULL,
                    round INT UNSIGNED NOT NULL,
                    number INT UNSIGNED NOT NULL,
                    player1 BIGINT UNSIGNED,
                    player2 BIGINT UNSIGNED,
                    score1 INT UNSIGNED,
                    score2 INT UNSIGNED,
                    winner BIGINT UNSIGNED,
                    status TINYINT UNSIGNED NOT NULL
                )",
                p
            ),
            format!(
                "CREATE TABLE IF NOT EXISTS {}records (
                    id BIGINT UNSIGNED PRIMARY KEY,
                    user_id BIGINT UNSIGNED NOT NULL,
                    kind TINYINT UNSIGNED NOT NULL,
                    value DOUBLE NOT NULL,
                    accuracy DOUBLE,
                    created_at TIMESTAMP NOT NULL
                )",
                p
            ),
            format!(
                "CREATE TABLE IF NOT EXISTS {}teams (
                    id BIGINT UNSIGNED PRIMARY KEY,
                    name TEXT NOT NULL,
                    members BLOB NOT NULL,
                    score INT UNSIGNED
                )",
                p
            ),
            format!(
                "CREATE TABLE IF NOT EXISTS {}photos (
                    id BIGINT UNSIGNED PRIMARY KEY,
                    url TEXT NOT NULL,
                    caption TEXT,
                    uploaded_at TIMESTAMP NOT NULL
                )",
                p
            ),
        ];

        for table in tables {
            sqlx::query(&table).execute(&self.pool).await?;
        }

        Ok(())
    }
}

#[derive(Copy, Clone, Debug)]
pub struct UsersClient<'a> {
    store: &'a Store,
}

impl<'a> UsersClient<'a> {
    pub async fn list(&self) -> Result<Vec<User>, Error> {
        let sql = format!(
            "SELECT id, name, department, phone, email, position FROM {}users",
            self.store.table_prefix
        );

        let mut rows = sqlx::query(&sql).fetch(&self.store.pool);

        let mut users = Vec::new();
        while let Some(row) = rows.try_next().await? {
            users.push(User {
                id: UserId(row.try_get("id")?),
                name: row.try_get("name")?,
                department: row.try_get("department")?,
                phone: row.try_get("phone")?,
                email: row.try_get("email")?,
                position: row.try_get("position")?,
            });
        }

        Ok(users)
    }

    pub async fn get(&self, id: UserId) -> Result<Option<User>, Error> {
        let row = get_one!(
            sqlx::query(&format!(
                "SELECT name, department, phone, email, position FROM {}users WHERE id = ?",
                self.store.table_prefix
            ))
            .bind(id.0)
            .fetch_one(&self.store.pool)
            .await
        );

        Ok(Some(User {
            id,
            name: row.try_get("name")?,
            department: row.try_get("department")?,
            phone: row.try_get("phone")?,
            email: row.try_get("email")?,
            position: row.try_get("position")?,
        }))
    }

    pub async fn insert(&self, user: &User) -> Result<UserId, Error> {
        let id: u64 = id::USER.generate();

        sqlx::query(&format!(
            "INSERT INTO {}users (id, name, department, phone, email, position) VALUES (?, ?, ?, ?, ?, ?)",
            self.store.table_prefix
        ))
        .bind(id)
        .bind(&user.name)
        .bind(&user.department)
        .bind(&user.phone)
        .bind(&user.email)
        .bind(&user.position)
        .execute(&self.store.pool)
        .await?;

        Ok(UserId(id))
    }

    pub async fn update(&self, id: UserId, user: &User) -> Result<(), Error> {
        sqlx::query(&format!(
            "UPDATE {}users SET name = ?, department = ?, phone = ?, email = ?, position = ? WHERE id = ?",
            self.store.table_prefix
        ))
        .bind(&user.name)
        .bind(&user.department)
        .bind(&user.phone)
        .bind(&user.email)
        .bind(&user.position)
        .bind(id.0)
        .execute(&self.store.pool)
        .await?;

        Ok(())
    }

    pub async fn delete(&self, id: UserId) -> Result<(), Error> {
        sqlx::query(&format!(
            "DELETE FROM {}users WHERE id = ?",
            self.store.table_prefix
        ))
        .bind(id.0)
        .execute(&self.store.pool)
        .await?;

        Ok(())
    }
}

#[derive(Copy, Clone, Debug)]
pub struct TournamentsClient<'a> {
    store: &'a Store,
}

impl<'a> TournamentsClient<'a> {
    /// Returns a list of all [`TournamentOverview`]s.
    pub async fn list(&self) -> Result<Vec<TournamentOverview>, Error> {
        let sql = format!(
            "SELECT id, name, kind, status, date FROM {}tournaments",
            self.store.table_prefix
        );

        let mut rows = sqlx::query(&sql).fetch(&self.store.pool);

        let mut tournaments = Vec::new();
        while let Some(row) = rows.try_next().await? {
            tournaments.push(TournamentOverview {
                id: TournamentId(row.try_get("id")?),
                name: row.try_get("name")?,
                kind: TournamentKind::from_u8(row.try_get("kind")?).unwrap(),
                status: TournamentStatus::from_u8(row.try_get("status")?).unwrap(),
                date: row.try_get("date")?,
            });
        }

        Ok(tournaments)
    }

    /// Returns the [`Tournament`] with the given `id`, with `participants`
    /// filled from the entrants table in seed order. Returns `None` if no
    /// tournament with the given `id` exists.
    pub async fn get(&self, id: TournamentId) -> Result<Option<Tournament>, Error> {
        let row = get_one!(
            sqlx::query(&format!(
                "SELECT name, kind, status, date FROM {}tournaments WHERE id = ?",
                self.store.table_prefix
            ))
            .bind(id.0)
            .fetch_one(&self.store.pool)
            .await
        );

        let entrants = self.store.entrants(id).list().await?;

        Ok(Some(Tournament {
            id,
            name: row.try_get("name")?,
            kind: TournamentKind::from_u8(row.try_get("kind")?).unwrap(),
            status: TournamentStatus::from_u8(row.try_get("status")?).unwrap(),
            date: row.try_get("date")?,
            participants: entrants.iter().map(|entrant| entrant.user_id).collect(),
        }))
    }

    pub async fn insert(&self, tournament: &Tournament) -> Result<TournamentId, Error> {
        let id: u64 = id::TOURNAMENT.generate();

        sqlx::query(&format!(
            "INSERT INTO {}tournaments (id, name, kind, status, date) VALUES (?, ?, ?, ?, ?)",
            self.store.table_prefix
        ))
        .bind(id)
        .bind(&tournament.name)
        .bind(tournament.kind.to_u8())
        .bind(tournament.status.to_u8())
        .bind(tournament.date)
        .execute(&self.store.pool)
        .await?;

        Ok(TournamentId(id))
    }

    pub async fn set_status(&self, id: TournamentId, status: TournamentStatus) -> Result<(), Error> {
        sqlx::query(&format!(
            "UPDATE {}tournaments SET status = ? WHERE id = ?",
            self.store.table_prefix
        ))
        .bind(status.to_u8())
        .bind(id.0)
        .execute(&self.store.pool)
        .await?;

        Ok(())
    }

    /// Deletes the [`Tournament`] with the given `id`, including its
    /// entrants and matches.
    pub async fn delete(&self, id: TournamentId) -> Result<(), Error> {
        sqlx::query(&format!(
            "DELETE FROM {}tournaments WHERE id = ?",
            self.store.table_prefix
        ))
        .bind(id.0)
        .execute(&self.store.pool)
        .await?;

        sqlx::query(&format!(
            "DELETE FROM {}entrants WHERE tournament_id = ?",
            self.store.table_prefix
        ))
        .bind(id.0)
        .execute(&self.store.pool)
        .await?;

        sqlx::query(&format!(
            "DELETE FROM {}matches WHERE tournament_id = ?",
            self.store.table_prefix
        ))
        .bind(id.0)
        .execute(&self.store.pool)
        .await?;

        Ok(())
    }
}

#[derive(Copy, Clone, Debug)]
pub struct EntrantsClient<'a> {
    store: &'a Store,
    id: TournamentId,
}

impl<'a> EntrantsClient<'a> {
    /// Returns all entrants of the tournament in seed order.
    pub async fn list(&self) -> Result<Vec<Entrant>, Error> {
        let sql = format!(
            "SELECT id, user_id, seed FROM {}entrants WHERE tournament_id = ? ORDER BY seed ASC",
            self.store.table_prefix
        );

        let mut rows = sqlx::query(&sql).bind(self.id.0).fetch(&self.store.pool);

        let mut entrants = Vec::new();
        while let Some(row) = rows.try_next().await? {
            entrants.push(Entrant {
                id: EntrantId(row.try_get("id")?),
                user_id: UserId(row.try_get("user_id")?),
                seed: row.try_get("seed")?,
            });
        }

        Ok(entrants)
    }

    pub async fn insert(&self, entrant: &Entrant) -> Result<EntrantId, Error> {
        let id: u64 = id::ENTRANT.generate();

        sqlx::query(&format!(
            "INSERT INTO {}entrants (id, tournament_id, user_id, seed) VALUES (?, ?, ?, ?)",
            self.store.table_prefix
        ))
        .bind(id)
        .bind(self.id.0)
        .bind(entrant.user_id.0)
        .bind(entrant.seed)
        .execute(&self.store.pool)
        .await?;

        Ok(EntrantId(id))
    }

    pub async fn delete(&self, id: EntrantId) -> Result<(), Error> {
        sqlx::query(&format!(
            "DELETE FROM {}entrants WHERE tournament_id = ? AND id = ?",
            self.store.table_prefix
        ))
        .bind(self.id.0)
        .bind(id.0)
        .execute(&self.store.pool)
        .await?;

        Ok(())
    }
}

#[derive(Copy, Clone, Debug)]
pub struct MatchesClient<'a> {
    store: &'a Store,
    id: TournamentId,
}

impl<'a> MatchesClient<'a> {
    fn decode(&self, row: &sqlx::mysql::MySqlRow) -> Result<Match, Error> {
        Ok(Match {
            id: MatchId(row.try_get("id")?),
            tournament_id: self.id,
            round: row.try_get("round")?,
            number: row.try_get("number")?,
            player1: row.try_get::<Option<u64>, _>("player1")?.map(EntrantId),
            player2: row.try_get::<Option<u64>, _>("player2")?.map(EntrantId),
            score1: row.try_get("score1")?,
            score2: row.try_get("score2")?,
            winner: row.try_get::<Option<u64>, _>("winner")?.map(EntrantId),
            status: MatchStatus::from_u8(row.try_get("status")?).unwrap(),
        })
    }

    /// Returns all matches of the tournament ordered by round, then by
    /// match number.
    pub async fn list(&self) -> Result<Vec<Match>, Error> {
        let sql = format!(
            "SELECT id, round, number, player1, player2, score1, score2, winner, status
             FROM {}matches WHERE tournament_id = ? ORDER BY round ASC, number ASC",
            self.store.table_prefix
        );

        let mut rows = sqlx::query(&sql).bind(self.id.0).fetch(&self.store.pool);

        let mut matches = Vec::new();
        while let Some(row) = rows.try_next().await? {
            matches.push(self.decode(&row)?);
        }

        Ok(matches)
    }

    /// Returns all matches of the given `round`.
    pub async fn list_round(&self, round: u32) -> Result<Vec<Match>, Error> {
        let sql = format!(
            "SELECT id, round, number, player1, player2, score1, score2, winner, status
             FROM {}matches WHERE tournament_id = ? AND round = ? ORDER BY number ASC",
            self.store.table_prefix
        );

        let mut rows = sqlx::query(&sql)
            .bind(self.id.0)
            .bind(round)
            .fetch(&self.store.pool);

        let mut matches = Vec::new();
        while let Some(row) = rows.try_next().await? {
            matches.push(self.decode(&row)?);
        }

        Ok(matches)
    }

    /// Returns the match at `(round, number)`.
    pub async fn get(&self, round: u32, number: u32) -> Result<Option<Match>, Error> {
        let row = get_one!(
            sqlx::query(&format!(
                "SELECT id, round, number, player1, player2, score1, score2, winner, status
                 FROM {}matches WHERE tournament_id = ? AND round = ? AND number = ?",
                self.store.table_prefix
            ))
            .bind(self.id.0)
            .bind(round)
            .bind(number)
            .fetch_one(&self.store.pool)
            .await
        );

        Ok(Some(self.decode(&row)?))
    }
}

#[derive(Copy, Clone, Debug)]
pub struct RecordsClient<'a> {
    store: &'a Store,
}

impl<'a> RecordsClient<'a> {
    fn decode(row: &sqlx::mysql::MySqlRow) -> Result<GolfRecord, Error> {
        Ok(GolfRecord {
            id: RecordId(row.try_get("id")?),
            user_id: UserId(row.try_get("user_id")?),
            kind: RecordKind::from_u8(row.try_get("kind")?).unwrap(),
            value: row.try_get("value")?,
            accuracy: row.try_get("accuracy")?,
            created_at: row.try_get("created_at")?,
        })
    }

    /// Returns all records, optionally filtered by contest `kind`.
    pub async fn list(&self, kind: Option<RecordKind>) -> Result<Vec<GolfRecord>, Error> {
        let mut sql = format!(
            "SELECT id, user_id, kind, value, accuracy, created_at FROM {}records",
            self.store.table_prefix
        );

        if kind.is_some() {
            sql.push_str(" WHERE kind = ?");
        }

        let mut query = sqlx::query(&sql);
        if let Some(kind) = kind {
            query = query.bind(kind.to_u8());
        }

        let mut rows = query.fetch(&self.store.pool);

        let mut records = Vec::new();
        while let Some(row) = rows.try_next().await? {
            records.push(Self::decode(&row)?);
        }

        Ok(records)
    }

    pub async fn get(&self, id: RecordId) -> Result<Option<GolfRecord>, Error> {
        let row = get_one!(
            sqlx::query(&format!(
                "SELECT id, user_id, kind, value, accuracy, created_at FROM {}records WHERE id = ?",
                self.store.table_prefix
            ))
            .bind(id.0)
            .fetch_one(&self.store.pool)
            .await
        );

        Ok(Some(Self::decode(&row)?))
    }

    pub async fn insert(&self, record: &GolfRecord) -> Result<RecordId, Error> {
        let id: u64 = id::RECORD.generate();

        sqlx::query(&format!(
            "INSERT INTO {}records (id, user_id, kind, value, accuracy, created_at) VALUES (?, ?, ?, ?, ?, ?)",
            self.store.table_prefix
        ))
        .bind(id)
        .bind(record.user_id.0)
        .bind(record.kind.to_u8())
        .bind(record.value)
        .bind(record.accuracy)
        .bind(record.created_at)
        .execute(&self.store.pool)
        .await?;

        Ok(RecordId(id))
    }

    pub async fn update(&self, id: RecordId, record: &GolfRecord) -> Result<(), Error> {
        sqlx::query(&format!(
            "UPDATE {}records SET value = ?, accuracy = ? WHERE id = ?",
            self.store.table_prefix
        ))
        .bind(record.value)
        .bind(record.accuracy)
        .bind(id.0)
        .execute(&self.store.pool)
        .await?;

        Ok(())
    }

    pub async fn delete(&self, id: RecordId) -> Result<(), Error> {
        sqlx::query(&format!(
            "DELETE FROM {}records WHERE id = ?",
            self.store.table_prefix
        ))
        .bind(id.0)
        .execute(&self.store.pool)
        .await?;

        Ok(())
    }
}

#[derive(Copy, Clone, Debug)]
pub struct TeamsClient<'a> {
    store: &'a Store,
}

impl<'a> TeamsClient<'a> {
    fn decode(row: &sqlx::mysql::MySqlRow) -> Result<ExecutiveTeam, Error> {
        let members: Vec<u8> = row.try_get("members")?;

        Ok(ExecutiveTeam {
            id: TeamId(row.try_get("id")?),
            name: row.try_get("name")?,
            members: serde_json::from_slice(&members)?,
            score: row.try_get("score")?,
        })
    }

    pub async fn list(&self) -> Result<Vec<ExecutiveTeam>, Error> {
        let sql = format!(
            "SELECT id, name, members, score FROM {}teams",
            self.store.table_prefix
        );

        let mut rows = sqlx::query(&sql).fetch(&self.store.pool);

        let mut teams = Vec::new();
        while let Some(row) = rows.try_next().await? {
            teams.push(Self::decode(&row)?);
        }

        Ok(teams)
    }

    pub async fn get(&self, id: TeamId) -> Result<Option<ExecutiveTeam>, Error> {
        let row = get_one!(
            sqlx::query(&format!(
                "SELECT id, name, members, score FROM {}teams WHERE id = ?",
                self.store.table_prefix
            ))
            .bind(id.0)
            .fetch_one(&self.store.pool)
            .await
        );

        Ok(Some(Self::decode(&row)?))
    }

    pub async fn insert(&self, team: &ExecutiveTeam) -> Result<TeamId, Error> {
        let id: u64 = id::TEAM.generate();

        sqlx::query(&format!(
            "INSERT INTO {}teams (id, name, members, score) VALUES (?, ?, ?, ?)",
            self.store.table_prefix
        ))
        .bind(id)
        .bind(&team.name)
        .bind(serde_json::to_vec(&team.members)?)
        .bind(team.score)
        .execute(&self.store.pool)
        .await?;

        Ok(TeamId(id))
    }

    pub async fn set_score(&self, id: TeamId, score: u32) -> Result<(), Error> {
        sqlx::query(&format!(
            "UPDATE {}teams SET score = ? WHERE id = ?",
            self.store.table_prefix
        ))
        .bind(score)
        .bind(id.0)
        .execute(&self.store.pool)
        .await?;

        Ok(())
    }

    pub async fn delete(&self, id: TeamId) -> Result<(), Error> {
        sqlx::query(&format!(
            "DELETE FROM {}teams WHERE id = ?",
            self.store.table_prefix
        ))
        .bind(id.0)
        .execute(&self.store.pool)
        .await?;

        Ok(())
    }
}

#[derive(Copy, Clone, Debug)]
pub struct PhotosClient<'a> {
    store: &'a Store,
}

impl<'a> PhotosClient<'a> {
    pub async fn list(&self) -> Result<Vec<Photo>, Error> {
        let sql = format!(
            "SELECT id, url, caption, uploaded_at FROM {}photos ORDER BY uploaded_at DESC",
            self.store.table_prefix
        );

        let mut rows = sqlx::query(&sql).fetch(&self.store.pool);

        let mut photos = Vec::new();
        while let Some(row) = rows.try_next().await? {
            photos.push(Photo {
                id: PhotoId(row.try_get("id")?),
                url: row.try_get("url")?,
                caption: row.try_get("caption")?,
                uploaded_at: row.try_get("uploaded_at")?,
            });
        }

        Ok(photos)
    }

    pub async fn insert(&self, photo: &Photo) -> Result<PhotoId, Error> {
        let id: u64 = id::PHOTO.generate();

        sqlx::query(&format!(
            "INSERT INTO {}photos (id, url, caption, uploaded_at) VALUES (?, ?, ?, ?)",
            self.store.table_prefix
        ))
        .bind(id)
        .bind(&photo.url)
        .bind(&photo.caption)
        .bind(photo.uploaded_at)
        .execute(&self.store.pool)
        .await?;

        Ok(PhotoId(id))
    }

    pub async fn delete(&self, id: PhotoId) -> Result<(), Error> {
        sqlx::query(&format!(
            "DELETE FROM {}photos WHERE id = ?",
            self.store.table_prefix
        ))
        .bind(id.0)
        .execute(&self.store.pool)
        .await?;

        Ok(())
    }

    pub async fn delete_all(&self) -> Result<u64, Error> {
        let res = sqlx::query(&format!("DELETE FROM {}photos", self.store.table_prefix))
            .execute(&self.store.pool)
            .await?;

        Ok(res.rows_affected())
    }
}
