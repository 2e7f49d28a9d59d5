//! In-memory transactional record store.
//!
//! Reads take a snapshot under a shared lock; writes commit whole batches
//! under the exclusive lock, so a batch is applied entirely or not at all.
//! Per-money-source mutexes serialize the write paths that depend on a
//! balance: a repository acquires the locks of every source it touches (in
//! sorted order), re-reads the balance, validates, and only then commits, so
//! no committed write was approved on a snapshot another commit invalidated.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use dashmap::DashMap;

use sitebook_core::ledger::types::{
    Category, Company, MoneySource, Project, SystemTag, Transaction, TransactionType, User,
};
use sitebook_shared::types::{
    CategoryId, CompanyId, MoneySourceId, ProjectId, TransactionId, UserId,
};

/// The two system categories the advance machinery relies on.
#[derive(Debug, Clone, Copy)]
pub struct SystemCategories {
    /// Category tagging advance-issuance legs.
    pub advance_issue: CategoryId,
    /// Category tagging advance-return transfers.
    pub advance_return: CategoryId,
}

/// A batch of records to commit atomically.
#[derive(Debug, Default)]
pub struct WriteBatch {
    /// Money sources to insert.
    pub new_sources: Vec<MoneySource>,
    /// Transactions to insert or replace.
    pub transactions: Vec<Transaction>,
}

impl WriteBatch {
    /// A batch holding a single transaction.
    #[must_use]
    pub fn transaction(txn: Transaction) -> Self {
        Self {
            new_sources: Vec::new(),
            transactions: vec![txn],
        }
    }
}

#[derive(Debug, Default)]
struct StoreInner {
    companies: BTreeMap<CompanyId, Company>,
    users: BTreeMap<UserId, User>,
    projects: BTreeMap<ProjectId, Project>,
    categories: BTreeMap<CategoryId, Category>,
    sources: BTreeMap<MoneySourceId, MoneySource>,
    transactions: BTreeMap<TransactionId, Transaction>,
}

/// In-memory record store with per-source write locks.
pub struct MemoryStore {
    inner: RwLock<StoreInner>,
    source_locks: DashMap<MoneySourceId, Arc<Mutex<()>>>,
    advance_locks: DashMap<UserId, Arc<Mutex<()>>>,
    system_categories: SystemCategories,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Creates an empty store with the shared system categories seeded.
    #[must_use]
    pub fn new() -> Self {
        let advance_issue = Category {
            id: CategoryId::new(),
            company_id: None,
            name: "Advance".to_string(),
            allowed_types: vec![TransactionType::Expense, TransactionType::Income],
            group_id: None,
            system_tag: Some(SystemTag::AdvanceIssue),
        };
        let advance_return = Category {
            id: CategoryId::new(),
            company_id: None,
            name: "Advance return".to_string(),
            allowed_types: vec![TransactionType::Internal],
            group_id: None,
            system_tag: Some(SystemTag::AdvanceReturn),
        };
        let system_categories = SystemCategories {
            advance_issue: advance_issue.id,
            advance_return: advance_return.id,
        };

        let mut inner = StoreInner::default();
        inner.categories.insert(advance_issue.id, advance_issue);
        inner.categories.insert(advance_return.id, advance_return);

        Self {
            inner: RwLock::new(inner),
            source_locks: DashMap::new(),
            advance_locks: DashMap::new(),
            system_categories,
        }
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, StoreInner> {
        self.inner.read().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, StoreInner> {
        self.inner.write().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    // ======================= seeding / admin surface =======================

    /// Inserts a company.
    pub fn insert_company(&self, company: Company) {
        self.write().companies.insert(company.id, company);
    }

    /// Inserts a user.
    pub fn insert_user(&self, user: User) {
        self.write().users.insert(user.id, user);
    }

    /// Inserts a project.
    pub fn insert_project(&self, project: Project) {
        self.write().projects.insert(project.id, project);
    }

    /// Inserts a category.
    pub fn insert_category(&self, category: Category) {
        self.write().categories.insert(category.id, category);
    }

    /// Inserts a money source.
    pub fn insert_source(&self, source: MoneySource) {
        self.write().sources.insert(source.id, source);
    }

    // ============================== queries ===============================

    /// The shared system categories.
    #[must_use]
    pub const fn system_categories(&self) -> SystemCategories {
        self.system_categories
    }

    /// Fetches a company.
    #[must_use]
    pub fn get_company(&self, id: CompanyId) -> Option<Company> {
        self.read().companies.get(&id).cloned()
    }

    /// Fetches a user.
    #[must_use]
    pub fn get_user(&self, id: UserId) -> Option<User> {
        self.read().users.get(&id).cloned()
    }

    /// Fetches a project.
    #[must_use]
    pub fn get_project(&self, id: ProjectId) -> Option<Project> {
        self.read().projects.get(&id).cloned()
    }

    /// Fetches a category.
    #[must_use]
    pub fn get_category(&self, id: CategoryId) -> Option<Category> {
        self.read().categories.get(&id).cloned()
    }

    /// Fetches a money source.
    #[must_use]
    pub fn get_source(&self, id: MoneySourceId) -> Option<MoneySource> {
        self.read().sources.get(&id).cloned()
    }

    /// Fetches a transaction.
    #[must_use]
    pub fn get_transaction(&self, id: TransactionId) -> Option<Transaction> {
        self.read().transactions.get(&id).cloned()
    }

    /// All users of a company.
    #[must_use]
    pub fn users_of(&self, company_id: CompanyId) -> Vec<User> {
        self.read()
            .users
            .values()
            .filter(|u| u.company_id == company_id)
            .cloned()
            .collect()
    }

    /// All money sources of a company.
    #[must_use]
    pub fn sources_of(&self, company_id: CompanyId) -> Vec<MoneySource> {
        self.read()
            .sources
            .values()
            .filter(|s| s.company_id == company_id)
            .cloned()
            .collect()
    }

    /// The recipient's active advance sub-account, if provisioned.
    #[must_use]
    pub fn find_advance_source(
        &self,
        company_id: CompanyId,
        owner: UserId,
    ) -> Option<MoneySource> {
        self.read()
            .sources
            .values()
            .find(|s| {
                s.company_id == company_id && s.owner_user_id == owner && s.is_advance && s.is_active
            })
            .cloned()
    }

    /// Snapshot of a company's transactions, ordered by ledger date then id.
    #[must_use]
    pub fn transactions_of(&self, company_id: CompanyId) -> Vec<Transaction> {
        let mut txns: Vec<Transaction> = self
            .read()
            .transactions
            .values()
            .filter(|t| t.company_id == company_id)
            .cloned()
            .collect();
        txns.sort_by_key(|t| (t.date, t.id));
        txns
    }

    /// Snapshot of the transactions touching a money source.
    #[must_use]
    pub fn transactions_touching(&self, source_id: MoneySourceId) -> Vec<Transaction> {
        self.read()
            .transactions
            .values()
            .filter(|t| {
                t.money_source_id == source_id || t.to_money_source_id == Some(source_id)
            })
            .cloned()
            .collect()
    }

    /// Both legs of an advance-issuance pair.
    #[must_use]
    pub fn transactions_in_pair(&self, pair_id: uuid::Uuid) -> Vec<Transaction> {
        self.read()
            .transactions
            .values()
            .filter(|t| t.pair_id == Some(pair_id))
            .cloned()
            .collect()
    }

    // ============================ write path ==============================

    /// Write locks for a set of money sources.
    ///
    /// Lock handles are returned in sorted id order; callers must acquire
    /// them in that order to stay deadlock-free across concurrent writers.
    #[must_use]
    pub fn write_locks(&self, ids: &[MoneySourceId]) -> Vec<Arc<Mutex<()>>> {
        let mut ids: Vec<MoneySourceId> = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();
        ids.into_iter()
            .map(|id| {
                self.source_locks
                    .entry(id)
                    .or_insert_with(|| Arc::new(Mutex::new(())))
                    .clone()
            })
            .collect()
    }

    /// Provisioning lock for a recipient's advance sub-account.
    ///
    /// Serializes concurrent first issuances to the same recipient so only
    /// one sub-account is ever created. Always acquired before any source
    /// locks (fixed lock order keeps writers deadlock-free).
    #[must_use]
    pub fn advance_lock(&self, recipient: UserId) -> Arc<Mutex<()>> {
        self.advance_locks
            .entry(recipient)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Acquires the given lock handles in order.
    #[must_use]
    pub fn acquire<'a>(locks: &'a [Arc<Mutex<()>>]) -> Vec<MutexGuard<'a, ()>> {
        locks
            .iter()
            .map(|lock| lock.lock().unwrap_or_else(std::sync::PoisonError::into_inner))
            .collect()
    }

    /// Commits a batch atomically: every record in the batch becomes visible
    /// in one step, or (if the caller never reaches this point) none do.
    pub fn commit(&self, batch: WriteBatch) {
        let mut inner = self.write();
        for source in batch.new_sources {
            inner.sources.insert(source.id, source);
        }
        for txn in batch.transactions {
            inner.transactions.insert(txn.id, txn);
        }
    }
}
