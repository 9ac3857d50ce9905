use crate::fs::{
    block_store::BlockStore,
    config::FsConfig,
    error::{FsError, Result},
    file_table::FileTable,
};

pub mod block_store;
pub mod config;
pub mod error;
pub mod file_table;

/// 内存中的块式文件存储引擎。
/// 文件表管理元数据，块存储区管理数据和占用情况，
/// 引擎负责两者之间的分配、回收和边界检查。
#[derive(Debug)]
pub struct FileSystem {
    config: FsConfig,
    table: FileTable,  // 文件元数据
    store: BlockStore, // 数据块和占用位图
}

impl FileSystem {
    pub fn new(config: FsConfig) -> Self {
        let table = FileTable::new(config.max_files);
        let store = BlockStore::new(&config);
        Self {
            config,
            table,
            store,
        }
    }

    /// 创建固定大小的文件。块分配是全有或全无：
    /// 中途耗尽时回滚所有已分配的块，不留下半个文件。
    pub fn create(&mut self, name: &str, size: usize) -> Result<()> {
        // 超长文件名先截断再查重，避免同前缀的长名字互相穿透
        let name = bound_name(name, self.config.max_filename);

        if self.table.find(&name).is_some() {
            return Err(FsError::AlreadyExists(name));
        }

        let slot = match self.table.alloc_slot() {
            Some(slot) => slot,
            None => return Err(FsError::TableFull),
        };

        let blocks_needed = self.config.blocks_needed(size);

        let mut blocks = Vec::new();
        blocks
            .try_reserve_exact(blocks_needed)
            .map_err(|_| FsError::Exhausted)?;

        for _ in 0..blocks_needed {
            match self.store.alloc() {
                Some(index) => blocks.push(index),
                None => {
                    // 空间不足，回滚已分配的块
                    for &block in &blocks {
                        self.store.release(block);
                    }
                    return Err(FsError::InsufficientSpace {
                        needed: blocks_needed,
                        free: self.store.free_blocks(),
                    });
                }
            }
        }

        // 全部块到手后才提交记录
        let record = &mut self.table.records[slot];
        record.in_use = true;
        record.name = name;
        record.size = size;
        record.blocks = blocks;

        Ok(())
    }

    /// 删除文件：先归还所有块，再清空槽位
    pub fn delete(&mut self, name: &str) -> Result<()> {
        let slot = self
            .table
            .find(name)
            .ok_or_else(|| FsError::NotFound(name.to_string()))?;

        let blocks = std::mem::take(&mut self.table.records[slot].blocks);
        for block in blocks {
            self.store.release(block);
        }
        self.table.free_slot(slot);

        Ok(())
    }

    /// 把 buf 写入文件 offset 处。写入不会扩展文件，
    /// 越过声明大小直接报错，存储区不被触碰。
    pub fn write(&mut self, name: &str, offset: usize, buf: &[u8]) -> Result<()> {
        let slot = self
            .table
            .find(name)
            .ok_or_else(|| FsError::NotFound(name.to_string()))?;
        let record = &self.table.records[slot];

        match offset.checked_add(buf.len()) {
            Some(end) if end <= record.size => {}
            _ => {
                return Err(FsError::OutOfBounds {
                    offset,
                    len: buf.len(),
                    size: record.size,
                })
            }
        }

        // 逻辑偏移 → 块编号 + 块内偏移，按块内连续区间分段拷贝
        let block_size = self.config.block_size;
        let mut written = 0;
        while written < buf.len() {
            let pos = offset + written;
            let block = record.blocks[pos / block_size];
            let in_block = pos % block_size;
            let run = (block_size - in_block).min(buf.len() - written);
            self.store
                .write_run(block, in_block, &buf[written..written + run]);
            written += run;
        }

        Ok(())
    }

    /// 从文件 offset 处读出 len 字节。
    /// 从未写过的区间返回块里残留的旧内容，引擎不做清零。
    pub fn read(&self, name: &str, offset: usize, len: usize) -> Result<Vec<u8>> {
        let slot = self
            .table
            .find(name)
            .ok_or_else(|| FsError::NotFound(name.to_string()))?;
        let record = &self.table.records[slot];

        match offset.checked_add(len) {
            Some(end) if end <= record.size => {}
            _ => {
                return Err(FsError::OutOfBounds {
                    offset,
                    len,
                    size: record.size,
                })
            }
        }

        let mut out = Vec::new();
        out.try_reserve_exact(len).map_err(|_| FsError::Exhausted)?;
        out.resize(len, 0);

        let block_size = self.config.block_size;
        let mut read = 0;
        while read < len {
            let pos = offset + read;
            let block = record.blocks[pos / block_size];
            let in_block = pos % block_size;
            let run = (block_size - in_block).min(len - read);
            self.store
                .read_run(block, in_block, &mut out[read..read + run]);
            read += run;
        }

        Ok(out)
    }

    /// 按槽位顺序列出所有存活文件的（名字，声明大小）
    pub fn list(&self) -> Vec<(String, usize)> {
        self.table
            .live()
            .map(|record| (record.name.clone(), record.size))
            .collect()
    }

    pub fn free_blocks(&self) -> usize {
        self.store.free_blocks()
    }

    pub fn total_blocks(&self) -> usize {
        self.store.total_blocks()
    }

    pub fn block_size(&self) -> usize {
        self.config.block_size
    }

    pub fn file_count(&self) -> usize {
        self.table.live_count()
    }

    pub fn max_files(&self) -> usize {
        self.table.capacity()
    }
}

/// 文件名截断到 max 字节，落在字符边界上
fn bound_name(name: &str, max: usize) -> String {
    if name.len() <= max {
        return name.to_string();
    }
    let mut end = max;
    while !name.is_char_boundary(end) {
        end -= 1;
    }
    name[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 4 块 × 8 字节 = 32 字节的小存储区
    fn tiny_fs() -> FileSystem {
        FileSystem::new(FsConfig {
            block_size: 8,
            total_blocks: 4,
            max_files: 3,
            max_filename: 32,
        })
    }

    /// 位图里的占用块数必须等于所有存活文件块表长度之和
    fn assert_exact_accounting(fs: &FileSystem) {
        let listed: usize = fs.table.live().map(|r| r.blocks.len()).sum();
        let occupied = fs.store.total_blocks() - fs.store.free_blocks();
        assert_eq!(listed, occupied);
    }

    #[test]
    fn create_allocates_expected_blocks() {
        let mut fs = tiny_fs();
        fs.create("a", 24).unwrap();

        assert_eq!(fs.free_blocks(), 1);
        assert_eq!(fs.list(), vec![("a".to_string(), 24)]);
        assert_exact_accounting(&fs);
    }

    #[test]
    fn zero_size_file_takes_no_blocks() {
        let mut fs = tiny_fs();
        fs.create("empty", 0).unwrap();

        assert_eq!(fs.free_blocks(), 4);
        assert_eq!(fs.list(), vec![("empty".to_string(), 0)]);
        assert_exact_accounting(&fs);
    }

    #[test]
    fn capacity_exhaustion_is_all_or_nothing() {
        let mut fs = tiny_fs();
        fs.create("a", 24).unwrap(); // 3 块
        let free_before = fs.free_blocks();

        // 2 块的请求只剩 1 块可用
        let err = fs.create("b", 16).unwrap_err();
        assert!(matches!(err, FsError::InsufficientSpace { needed: 2, .. }));

        // 失败的 create 不泄漏任何块
        assert_eq!(fs.free_blocks(), free_before);
        assert_eq!(fs.free_blocks(), 1);
        assert_eq!(fs.list().len(), 1);
        assert_exact_accounting(&fs);
    }

    #[test]
    fn table_full_leaves_free_count_unchanged() {
        let mut fs = tiny_fs();
        fs.create("a", 1).unwrap();
        fs.create("b", 1).unwrap();
        fs.create("c", 1).unwrap();
        let free_before = fs.free_blocks();

        let err = fs.create("d", 1).unwrap_err();
        assert!(matches!(err, FsError::TableFull));
        assert_eq!(fs.free_blocks(), free_before);
        assert_exact_accounting(&fs);
    }

    #[test]
    fn name_collision_keeps_first_file() {
        let mut fs = tiny_fs();
        fs.create("x", 10).unwrap();
        fs.write("x", 0, b"hello").unwrap();

        let err = fs.create("x", 20).unwrap_err();
        assert!(matches!(err, FsError::AlreadyExists(_)));

        assert_eq!(fs.list(), vec![("x".to_string(), 10)]);
        assert_eq!(fs.read("x", 0, 5).unwrap(), b"hello");
        assert_exact_accounting(&fs);
    }

    #[test]
    fn no_double_allocation_across_files() {
        let mut fs = tiny_fs();
        fs.create("a", 10).unwrap();
        fs.create("b", 10).unwrap();
        fs.delete("a").unwrap();
        fs.create("c", 16).unwrap();

        let mut all_blocks: Vec<usize> = fs
            .table
            .live()
            .flat_map(|r| r.blocks.iter().copied())
            .collect();
        all_blocks.sort_unstable();
        let before = all_blocks.len();
        all_blocks.dedup();
        assert_eq!(all_blocks.len(), before);

        for &block in &all_blocks {
            assert!(fs.store.is_used(block));
        }
        assert_exact_accounting(&fs);
    }

    #[test]
    fn delete_then_recreate_reuses_blocks() {
        let mut fs = tiny_fs();
        fs.create("f", 32).unwrap();
        assert_eq!(fs.free_blocks(), 0);

        fs.delete("f").unwrap();
        assert_eq!(fs.free_blocks(), 4);

        fs.create("f", 16).unwrap();
        assert_eq!(fs.free_blocks(), 2);
        assert_exact_accounting(&fs);
    }

    #[test]
    fn delete_unknown_mutates_nothing() {
        let mut fs = tiny_fs();
        fs.create("a", 10).unwrap();
        let free_before = fs.free_blocks();

        let err = fs.delete("ghost").unwrap_err();
        assert!(matches!(err, FsError::NotFound(_)));

        assert_eq!(fs.free_blocks(), free_before);
        assert_eq!(fs.list().len(), 1);
        assert_exact_accounting(&fs);
    }

    #[test]
    fn write_read_round_trip_across_blocks() {
        let mut fs = tiny_fs();
        fs.create("f", 24).unwrap();

        // 6..20 跨越块 0、1、2
        let data = b"block boundary";
        fs.write("f", 6, data).unwrap();
        assert_eq!(fs.read("f", 6, data.len()).unwrap(), data);

        // 同一偏移重复写，后写覆盖先写
        fs.write("f", 6, b"BLOCK").unwrap();
        assert_eq!(fs.read("f", 6, 14).unwrap(), b"BLOCK boundary");
    }

    #[test]
    fn out_of_bounds_never_touches_store() {
        let mut fs = tiny_fs();
        fs.create("f", 10).unwrap();
        fs.write("f", 0, b"0123456789").unwrap();

        let err = fs.write("f", 8, b"abc").unwrap_err();
        assert!(matches!(err, FsError::OutOfBounds { .. }));
        let err = fs.read("f", 8, 3).unwrap_err();
        assert!(matches!(err, FsError::OutOfBounds { .. }));
        // offset + len 溢出也按越界处理
        let err = fs.read("f", usize::MAX, 2).unwrap_err();
        assert!(matches!(err, FsError::OutOfBounds { .. }));

        assert_eq!(fs.read("f", 0, 10).unwrap(), b"0123456789");
    }

    #[test]
    fn missing_file_reports_not_found() {
        let mut fs = tiny_fs();
        assert!(matches!(
            fs.write("nope", 0, b"x").unwrap_err(),
            FsError::NotFound(_)
        ));
        assert!(matches!(
            fs.read("nope", 0, 1).unwrap_err(),
            FsError::NotFound(_)
        ));
    }

    #[test]
    fn reused_blocks_expose_stale_content() {
        let mut fs = tiny_fs();
        fs.create("old", 8).unwrap();
        fs.write("old", 0, b"residual").unwrap();
        fs.delete("old").unwrap();

        // 新文件拿到同一个块，未写入的区间可见旧内容
        fs.create("new", 8).unwrap();
        assert_eq!(fs.read("new", 0, 8).unwrap(), b"residual");
    }

    #[test]
    fn list_is_slot_ordered_and_reuses_lowest_slot() {
        let mut fs = tiny_fs();
        fs.create("a", 1).unwrap();
        fs.create("b", 1).unwrap();
        fs.create("c", 1).unwrap();
        fs.delete("a").unwrap();
        fs.create("d", 1).unwrap(); // 复用槽位 0

        let names: Vec<String> = fs.list().into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["d", "b", "c"]);
    }

    #[test]
    fn long_names_are_truncated_before_uniqueness_check() {
        let mut fs = FileSystem::new(FsConfig {
            block_size: 8,
            total_blocks: 4,
            max_files: 3,
            max_filename: 4,
        });

        fs.create("abcdef", 1).unwrap();
        assert_eq!(fs.list(), vec![("abcd".to_string(), 1)]);

        // 同一截断结果视为重名
        let err = fs.create("abcdXY", 1).unwrap_err();
        assert!(matches!(err, FsError::AlreadyExists(_)));

        // 查找按原样比较，长名字找不到截断后的记录
        assert!(matches!(
            fs.delete("abcdef").unwrap_err(),
            FsError::NotFound(_)
        ));
        fs.delete("abcd").unwrap();
    }
}
